//! # Model Configuration
//!
//! Loader for the `config.json` file of a Marian model directory.
//!
//! The file is the standard exported model configuration, so it carries many
//! fields this crate has no use for; unknown fields are ignored. The fields
//! that *are* read split into required (`vocab_size`, `eos_token_id`,
//! `pad_token_id`, `decoder_start_token_id` — absence fails the load) and
//! optional with defaults.

use serde::Deserialize;

use crate::{
    errors::{MTError, MTResult},
    types::TokenId,
};

/// Default for `max_length` when the configuration does not provide one.
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// The raw deserialization target.
///
/// Everything is optional here; requiredness and defaulting are applied in
/// [`TokenizerConfig::from_slice`], so that a missing field yields a
/// [`MTError::MissingField`] naming the field, rather than an opaque serde
/// message.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    vocab_size: Option<usize>,
    decoder_vocab_size: Option<usize>,
    eos_token_id: Option<TokenId>,
    bos_token_id: Option<TokenId>,
    pad_token_id: Option<TokenId>,
    decoder_start_token_id: Option<TokenId>,
    max_length: Option<usize>,
    model_max_length: Option<usize>,
    bad_words_ids: Option<Vec<Vec<TokenId>>>,
}

/// Immutable tokenizer configuration.
///
/// All defaulting is resolved at load time; the struct never contains
/// "absent" markers. Absence means JSON-absent (or `null`): an explicit
/// `"bos_token_id": 0` is kept as 0, not replaced by the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Size of the encoder vocabulary.
    pub vocab_size: usize,

    /// Size of the decoder vocabulary; defaults to [`vocab_size`](Self::vocab_size).
    pub decoder_vocab_size: usize,

    /// End-of-sequence token id.
    pub eos_token_id: TokenId,

    /// Beginning-of-sequence token id; defaults to [`eos_token_id`](Self::eos_token_id).
    pub bos_token_id: TokenId,

    /// Padding token id.
    pub pad_token_id: TokenId,

    /// The id generation starts from on the decoder side.
    pub decoder_start_token_id: TokenId,

    /// Generation length limit; defaults to [`DEFAULT_MAX_LENGTH`].
    pub max_length: usize,

    /// Hard input length limit; defaults to [`max_length`](Self::max_length).
    pub model_max_length: usize,

    /// Ordered list of disallowed id sequences.
    ///
    /// Stored for downstream generation constraints; nothing in this crate
    /// enforces it.
    pub bad_words_ids: Vec<Vec<TokenId>>,
}

fn require<T>(
    value: Option<T>,
    field: &'static str,
) -> MTResult<T> {
    value.ok_or(MTError::MissingField { field })
}

impl TokenizerConfig {
    /// Parse a `config.json` byte buffer.
    ///
    /// Pure: no side effects, and no partial configuration is ever returned.
    /// Any JSON syntax error or type mismatch anywhere in the document fails
    /// the whole parse.
    ///
    /// ## Arguments
    /// * `bytes` - The raw file contents.
    ///
    /// ## Returns
    /// The resolved configuration, or an error.
    pub fn from_slice(bytes: &[u8]) -> MTResult<Self> {
        let raw: RawConfig = serde_json::from_slice(bytes)?;

        let vocab_size = require(raw.vocab_size, "vocab_size")?;
        let eos_token_id = require(raw.eos_token_id, "eos_token_id")?;
        let pad_token_id = require(raw.pad_token_id, "pad_token_id")?;
        let decoder_start_token_id =
            require(raw.decoder_start_token_id, "decoder_start_token_id")?;

        let max_length = raw.max_length.unwrap_or(DEFAULT_MAX_LENGTH);

        Ok(Self {
            vocab_size,
            decoder_vocab_size: raw.decoder_vocab_size.unwrap_or(vocab_size),
            eos_token_id,
            bos_token_id: raw.bos_token_id.unwrap_or(eos_token_id),
            pad_token_id,
            decoder_start_token_id,
            max_length,
            model_max_length: raw.model_max_length.unwrap_or(max_length),
            bad_words_ids: raw.bad_words_ids.unwrap_or_default(),
        })
    }
}
