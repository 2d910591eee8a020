//! # Marian Tokenizer Core
//!
//! [`MarianTokenizer`] composes the configuration, the vocabulary table, and
//! two subword models (source side, target side) into the encode / decode /
//! batch operations a Marian-style model pipeline consumes.
//!
//! The instance is read-only after construction: every operation is a pure
//! function of the loaded state and its arguments. Construction is
//! all-or-nothing; a failure in any of the four sub-loads yields no instance.
//!
//! Buffer-writing operations (`encode_into`, `encode_batch_into`,
//! `decode_into`) build their result in an owned buffer first and copy into
//! the caller's buffer only after the capacity check passes, so a failed
//! call never leaves a partial write. Capacity violations are
//! [`MTError::BufferTooSmall`]; truncation to `model_max_length` is not an
//! error, it is policy and produces a valid shorter result.

use crate::{
    config::TokenizerConfig,
    errors::{MTError, MTResult},
    subword::SubwordModel,
    types::{MTHashSet, TokenId, UNK_TOKEN},
    vocab::VocabTable,
};

/// A loaded Marian tokenizer.
pub struct MarianTokenizer {
    config: TokenizerConfig,
    raw_config: Vec<u8>,
    vocab: VocabTable,

    source: Box<dyn SubwordModel>,
    target: Box<dyn SubwordModel>,

    /// `{eos, pad, unk}`; consulted only when decode skips specials.
    special_ids: MTHashSet<TokenId>,
}

impl MarianTokenizer {
    /// Assemble a tokenizer from already-loaded components.
    ///
    /// This is the seam for embedders with their own segmentation backend,
    /// and for tests; [`from_dir`](Self::from_dir) is the file-based path.
    ///
    /// ## Arguments
    /// * `config` - The resolved configuration.
    /// * `raw_config` - The raw `config.json` bytes the configuration was
    ///   parsed from (served back by [`raw_config_bytes`](Self::raw_config_bytes)).
    /// * `vocab` - The external vocabulary table.
    /// * `source` - The source-side subword model, used by encode.
    /// * `target` - The target-side subword model, used by decode.
    pub fn from_parts(
        config: TokenizerConfig,
        raw_config: Vec<u8>,
        vocab: VocabTable,
        source: Box<dyn SubwordModel>,
        target: Box<dyn SubwordModel>,
    ) -> Self {
        let special_ids = [config.eos_token_id, config.pad_token_id, vocab.unk_id()]
            .into_iter()
            .collect();
        Self {
            config,
            raw_config,
            vocab,
            source,
            target,
            special_ids,
        }
    }

    /// Load a tokenizer from a Marian model directory.
    ///
    /// The directory must contain `config.json`, `vocab.json`, `source.spm`,
    /// and `target.spm`; absence or parse failure of any of them fails the
    /// whole load.
    #[cfg(feature = "spm")]
    pub fn from_dir<P: AsRef<std::path::Path>>(dir: P) -> MTResult<Self> {
        use crate::subword::SentencePieceModel;

        let dir = dir.as_ref();

        let raw_config = std::fs::read(dir.join("config.json"))?;
        let config = TokenizerConfig::from_slice(&raw_config)?;

        let vocab = VocabTable::from_slice(&std::fs::read(dir.join("vocab.json"))?)?;

        let source = SentencePieceModel::from_file(&dir.join("source.spm"))?;
        let target = SentencePieceModel::from_file(&dir.join("target.spm"))?;

        log::debug!(
            "loaded tokenizer from {}: vocab {} entries (reverse table {}), \
             source/target models {}/{} pieces",
            dir.display(),
            vocab.len(),
            vocab.reverse_len(),
            source.vocab_size(),
            target.vocab_size(),
        );

        Ok(Self::from_parts(
            config,
            raw_config,
            vocab,
            Box::new(source),
            Box::new(target),
        ))
    }

    /// The resolved configuration.
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// The external vocabulary table.
    pub fn vocab(&self) -> &VocabTable {
        &self.vocab
    }

    /// The raw `config.json` bytes this tokenizer was loaded from.
    pub fn raw_config_bytes(&self) -> &[u8] {
        &self.raw_config
    }

    /// The padding token id.
    pub fn pad_id(&self) -> TokenId {
        self.config.pad_token_id
    }

    /// The end-of-sequence token id.
    pub fn eos_id(&self) -> TokenId {
        self.config.eos_token_id
    }

    /// The hard input length limit.
    pub fn model_max_length(&self) -> usize {
        self.config.model_max_length
    }

    /// Whether an id belongs to the derived special set `{eos, pad, unk}`.
    pub fn is_special(
        &self,
        id: TokenId,
    ) -> bool {
        self.special_ids.contains(&id)
    }

    /// Encode one source sentence into external vocabulary ids.
    ///
    /// Pieces absent from the vocabulary map to the unk id. When `add_eos`
    /// is set, EOS is appended *before* the sequence is truncated to
    /// `model_max_length` — so on over-long input the EOS itself can be
    /// truncated away.
    ///
    /// ## Arguments
    /// * `text` - The sentence to encode.
    /// * `add_eos` - Append the EOS id after the content ids.
    ///
    /// ## Returns
    /// The (possibly truncated) id sequence.
    pub fn encode(
        &self,
        text: &str,
        add_eos: bool,
    ) -> MTResult<Vec<TokenId>> {
        let pieces = self.source.encode_pieces(text)?;

        let mut ids: Vec<TokenId> = Vec::with_capacity(pieces.len() + 1);
        for piece in &pieces {
            ids.push(
                self.vocab
                    .token_to_id(piece)
                    .unwrap_or_else(|| self.vocab.unk_id()),
            );
        }

        if add_eos {
            ids.push(self.config.eos_token_id);
        }
        ids.truncate(self.config.model_max_length);

        Ok(ids)
    }

    /// Encode one source sentence into a caller-owned buffer.
    ///
    /// Truncation to `model_max_length` happens first and silently, as in
    /// [`encode`](Self::encode); a result that then still exceeds
    /// `out.len()` is a [`MTError::BufferTooSmall`] error — the two limits
    /// are independent conditions.
    ///
    /// ## Returns
    /// The number of ids written.
    pub fn encode_into(
        &self,
        text: &str,
        add_eos: bool,
        out: &mut [TokenId],
    ) -> MTResult<usize> {
        let ids = self.encode(text, add_eos)?;
        if ids.len() > out.len() {
            return Err(MTError::BufferTooSmall {
                required: ids.len(),
                capacity: out.len(),
            });
        }
        out[..ids.len()].copy_from_slice(&ids);
        Ok(ids.len())
    }

    /// Encode a batch of sentences into caller-owned row-major buffers.
    ///
    /// Rows are independent. A `None` text yields a length-0 row whose
    /// buffer contents are left untouched. Present texts follow the
    /// single-sentence algorithm; the row is written left-aligned into its
    /// stride and right-padded with the pad id out to `max_len`.
    ///
    /// The whole batch fails if any row's true length exceeds `max_len`.
    /// That is checked row by row as rows are computed, so a failing row
    /// aborts before later rows are touched; rows are only written out once
    /// every row has passed, so a failed call leaves both buffers exactly as
    /// the caller supplied them.
    ///
    /// ## Arguments
    /// * `texts` - One optional sentence per row.
    /// * `add_eos` - Append EOS to each present row.
    /// * `max_len` - The row stride; must be positive.
    /// * `ids` - Id buffer of exactly `texts.len() * max_len` entries.
    /// * `seq_lens` - Per-row true lengths; exactly `texts.len()` entries.
    ///
    /// ## Returns
    /// The maximum realized row length across the batch (pad fill excluded),
    /// not the stride.
    pub fn encode_batch_into(
        &self,
        texts: &[Option<&str>],
        add_eos: bool,
        max_len: usize,
        ids: &mut [TokenId],
        seq_lens: &mut [usize],
    ) -> MTResult<usize> {
        validate_batch_shape(texts.len(), max_len, ids.len(), seq_lens.len())?;

        let mut rows: Vec<Option<Vec<TokenId>>> = Vec::with_capacity(texts.len());
        for text in texts {
            rows.push(match text {
                None => None,
                Some(text) => {
                    let row = self.encode(text, add_eos)?;
                    if row.len() > max_len {
                        return Err(MTError::BufferTooSmall {
                            required: row.len(),
                            capacity: max_len,
                        });
                    }
                    Some(row)
                }
            });
        }

        Ok(write_batch_rows(
            &rows,
            self.config.pad_token_id,
            max_len,
            ids,
            seq_lens,
        ))
    }

    /// Decode external vocabulary ids back into a target sentence.
    ///
    /// Unknown ids never fail the decode: an id outside the reverse table,
    /// or one whose slot is unmapped, contributes the literal `<unk>` token.
    /// With `skip_special`, ids in `{eos, pad, unk}` are dropped before the
    /// lookup. An id list that is empty — or fully filtered — decodes to the
    /// empty string, which is success, not an error.
    ///
    /// ## Arguments
    /// * `ids` - The id sequence to decode.
    /// * `skip_special` - Drop special ids before decoding.
    pub fn decode(
        &self,
        ids: &[TokenId],
        skip_special: bool,
    ) -> MTResult<String> {
        let mut pieces: Vec<String> = Vec::with_capacity(ids.len());
        for &id in ids {
            if skip_special && self.special_ids.contains(&id) {
                continue;
            }
            pieces.push(
                self.vocab
                    .id_to_token(id)
                    .unwrap_or(UNK_TOKEN)
                    .to_string(),
            );
        }

        if pieces.is_empty() {
            return Ok(String::new());
        }
        self.target.decode_pieces(&pieces)
    }

    /// Decode into a caller-owned byte buffer.
    ///
    /// The capacity check runs after decoding, once the true size is known;
    /// on [`MTError::BufferTooSmall`] nothing is written. The buffer
    /// receives the raw UTF-8 bytes with no terminator; C-string handling
    /// belongs to the boundary layer.
    ///
    /// ## Returns
    /// The number of bytes written.
    pub fn decode_into(
        &self,
        ids: &[TokenId],
        skip_special: bool,
        out: &mut [u8],
    ) -> MTResult<usize> {
        let text = self.decode(ids, skip_special)?;
        let bytes = text.as_bytes();
        if bytes.len() > out.len() {
            return Err(MTError::BufferTooSmall {
                required: bytes.len(),
                capacity: out.len(),
            });
        }
        out[..bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len())
    }
}

/// Check batch buffer shapes; shared by the sequential and rayon paths.
pub(crate) fn validate_batch_shape(
    batch: usize,
    max_len: usize,
    ids_len: usize,
    lens_len: usize,
) -> MTResult<()> {
    if max_len == 0 {
        return Err(MTError::InvalidArgument(
            "batch row stride must be positive".to_string(),
        ));
    }
    if lens_len != batch {
        return Err(MTError::InvalidArgument(format!(
            "seq_lens holds {lens_len} entries, expected {batch}"
        )));
    }
    if ids_len != batch * max_len {
        return Err(MTError::InvalidArgument(format!(
            "id buffer holds {ids_len} entries, expected {}",
            batch * max_len
        )));
    }
    Ok(())
}

/// Write fully-computed rows into the caller's buffers.
///
/// Every `Some` row must already fit `max_len`. Absent rows get length 0
/// and an untouched stride. Returns the maximum realized row length.
pub(crate) fn write_batch_rows(
    rows: &[Option<Vec<TokenId>>],
    pad_id: TokenId,
    max_len: usize,
    ids: &mut [TokenId],
    seq_lens: &mut [usize],
) -> usize {
    let mut batch_max = 0usize;
    for (b, row) in rows.iter().enumerate() {
        let Some(row) = row else {
            seq_lens[b] = 0;
            continue;
        };

        let stride = &mut ids[b * max_len..(b + 1) * max_len];
        stride[..row.len()].copy_from_slice(row);
        stride[row.len()..].fill(pad_id);

        seq_lens[b] = row.len();
        batch_max = batch_max.max(row.len());
    }
    batch_max
}
