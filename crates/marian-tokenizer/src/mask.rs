//! # Attention Mask Construction
//!
//! Stateless utilities: masks are a pure function of per-row sequence
//! lengths and the row stride, independent of any tokenizer instance.

use crate::errors::{MTError, MTResult};

/// Fill a caller-owned row-major attention-mask buffer.
///
/// For each row `b`, `seq_lens[b]` is clamped into `[0, max_len]` (negative
/// lengths clamp to 0, oversized lengths to `max_len`); positions below the
/// clamped length are written 1, the rest 0. Clamping means this never fails
/// for any length values; only malformed shapes are errors.
///
/// ## Arguments
/// * `seq_lens` - Per-row sequence lengths; one entry per row.
/// * `max_len` - The row stride; must be positive.
/// * `out` - The mask buffer; must hold exactly `seq_lens.len() * max_len`.
///
/// ## Returns
/// `Ok(())`, or [`MTError::InvalidArgument`] on a shape violation.
pub fn fill_attention_mask(
    seq_lens: &[i64],
    max_len: usize,
    out: &mut [i64],
) -> MTResult<()> {
    if max_len == 0 {
        return Err(MTError::InvalidArgument(
            "attention mask stride must be positive".to_string(),
        ));
    }
    let expected = seq_lens.len() * max_len;
    if out.len() != expected {
        return Err(MTError::InvalidArgument(format!(
            "attention mask buffer holds {} entries, expected {expected}",
            out.len()
        )));
    }

    for (row, &len) in out.chunks_exact_mut(max_len).zip(seq_lens) {
        let clamped = len.clamp(0, max_len as i64) as usize;
        row[..clamped].fill(1);
        row[clamped..].fill(0);
    }
    Ok(())
}

/// Build an attention mask as an owned row-major buffer.
///
/// Convenience wrapper over [`fill_attention_mask`].
pub fn build_attention_mask(
    seq_lens: &[i64],
    max_len: usize,
) -> MTResult<Vec<i64>> {
    let mut out = vec![0i64; seq_lens.len() * max_len];
    fill_attention_mask(seq_lens, max_len, &mut out)?;
    Ok(out)
}
