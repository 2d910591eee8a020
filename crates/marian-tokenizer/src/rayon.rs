//! # Parallel Batch Encoding
//!
//! Batch rows are logically independent, so the compute phase can run on
//! the ``rayon`` pool. The contract is identical to
//! [`MarianTokenizer::encode_batch_into`]: any failing row aborts the whole
//! call (when several rows fail concurrently, whichever error rayon
//! surfaces is the one reported), the returned maximum reflects all rows,
//! and nothing is written on failure.

use rayon::prelude::*;

use crate::{
    errors::{MTError, MTResult},
    tokenizer::{MarianTokenizer, validate_batch_shape, write_batch_rows},
    types::TokenId,
};

/// Encode a batch of sentences in parallel into caller-owned buffers.
///
/// See [`MarianTokenizer::encode_batch_into`] for the buffer contract.
pub fn par_encode_batch_into(
    tokenizer: &MarianTokenizer,
    texts: &[Option<&str>],
    add_eos: bool,
    max_len: usize,
    ids: &mut [TokenId],
    seq_lens: &mut [usize],
) -> MTResult<usize> {
    validate_batch_shape(texts.len(), max_len, ids.len(), seq_lens.len())?;

    let rows: Vec<Option<Vec<TokenId>>> = texts
        .par_iter()
        .map(|text| {
            let Some(text) = text else {
                return Ok(None);
            };
            let row = tokenizer.encode(text, add_eos)?;
            if row.len() > max_len {
                return Err(MTError::BufferTooSmall {
                    required: row.len(),
                    capacity: max_len,
                });
            }
            Ok(Some(row))
        })
        .collect::<MTResult<_>>()?;

    Ok(write_batch_rows(
        &rows,
        tokenizer.pad_id(),
        max_len,
        ids,
        seq_lens,
    ))
}
