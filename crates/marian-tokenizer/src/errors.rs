//! # Error Types

use crate::types::TokenId;

/// Errors from marian-tokenizer operations.
///
/// The variants group into the four boundary error kinds: construction
/// failures ([`Io`](MTError::Io), [`Json`](MTError::Json),
/// [`MissingField`](MTError::MissingField),
/// [`MalformedVocab`](MTError::MalformedVocab),
/// [`NegativeVocabId`](MTError::NegativeVocabId),
/// [`ModelLoad`](MTError::ModelLoad)), caller bugs
/// ([`InvalidArgument`](MTError::InvalidArgument)), propagated subword-model
/// failures ([`Segmentation`](MTError::Segmentation)), and capacity
/// violations ([`BufferTooSmall`](MTError::BufferTooSmall)).
///
/// `BufferTooSmall` is a hard error: the true output did not fit the
/// caller-declared capacity. It is distinct from truncation to
/// `model_max_length`, which is silent policy and produces a valid
/// (shorter) result.
#[derive(Debug, thiserror::Error)]
pub enum MTError {
    /// I/O error reading a model directory file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON syntax or type error anywhere in a model file.
    #[error("parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required configuration field is absent.
    #[error("config.json is missing required field {field:?}")]
    MissingField {
        /// The JSON field name.
        field: &'static str,
    },

    /// The vocabulary file is structurally invalid (non-object document,
    /// non-integer id).
    #[error("malformed vocab.json: {0}")]
    MalformedVocab(String),

    /// A vocabulary entry maps to a negative id.
    #[error("vocab.json maps token {token:?} to negative id {id}")]
    NegativeVocabId {
        /// The token string.
        token: String,
        /// The offending id.
        id: TokenId,
    },

    /// A subword model file is absent or malformed.
    #[error("subword model load failed: {0}")]
    ModelLoad(String),

    /// The underlying subword model rejected its input.
    #[error("segmentation failed: {0}")]
    Segmentation(String),

    /// The true output size exceeds the caller-declared capacity.
    #[error("output length {required} exceeds buffer capacity {capacity}")]
    BufferTooSmall {
        /// The length the output actually needs.
        required: usize,
        /// The capacity the caller declared.
        capacity: usize,
    },

    /// A malformed argument (mismatched buffer shapes, zero stride, etc.).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for marian-tokenizer operations.
pub type MTResult<T> = core::result::Result<T, MTError>;
