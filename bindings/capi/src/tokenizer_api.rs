//! # Tokenizer Surface
//!
//! `marian_tok_*`: construction, teardown, accessors, and the encode /
//! decode / batch / mask operations over caller-owned buffers.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::sync::Arc;

use marian_tokenizer::{MarianTokenizer, mask};

use crate::{
    MARIAN_ERR_INVALID_ARGUMENT, MARIAN_ERR_INVALID_HANDLE, MARIAN_OK, clear_last_error,
    cstr_arg, fail, fail_with, registry::TOKENIZERS, write_c_string,
};

fn live_tokenizer(handle: i64) -> Result<Arc<MarianTokenizer>, c_int> {
    TOKENIZERS.get(handle).ok_or_else(|| {
        fail(
            MARIAN_ERR_INVALID_HANDLE,
            format!("tokenizer handle {handle} is not live"),
        )
    })
}

/// Load a tokenizer from a model directory containing `config.json`,
/// `vocab.json`, `source.spm`, and `target.spm`.
///
/// Returns a positive handle, or a negative error code. Construction is
/// all-or-nothing: on failure no handle is registered.
///
/// # Safety
/// `dir` must be null or a NUL-terminated string live for the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_tok_new(dir: *const c_char) -> i64 {
    clear_last_error();

    let dir = match unsafe { cstr_arg(dir, "dir") } {
        Ok(dir) => dir,
        Err(code) => return i64::from(code),
    };

    match MarianTokenizer::from_dir(dir) {
        Ok(tokenizer) => TOKENIZERS.insert(tokenizer),
        Err(err) => i64::from(fail_with(&err)),
    }
}

/// Release a tokenizer. The handle is invalid afterwards; further use of it
/// returns [`MARIAN_ERR_INVALID_HANDLE`](crate::MARIAN_ERR_INVALID_HANDLE).
#[unsafe(no_mangle)]
pub extern "C" fn marian_tok_free(handle: i64) -> c_int {
    clear_last_error();
    if TOKENIZERS.remove(handle) {
        MARIAN_OK
    } else {
        fail(
            MARIAN_ERR_INVALID_HANDLE,
            format!("tokenizer handle {handle} is not live"),
        )
    }
}

/// The padding token id, or a negative error code.
#[unsafe(no_mangle)]
pub extern "C" fn marian_tok_pad_id(handle: i64) -> i64 {
    clear_last_error();
    match live_tokenizer(handle) {
        Ok(tokenizer) => tokenizer.pad_id(),
        Err(code) => i64::from(code),
    }
}

/// The hard input length limit, or a negative error code.
#[unsafe(no_mangle)]
pub extern "C" fn marian_tok_model_max_length(handle: i64) -> i64 {
    clear_last_error();
    match live_tokenizer(handle) {
        Ok(tokenizer) => tokenizer.model_max_length() as i64,
        Err(code) => i64::from(code),
    }
}

/// The raw `config.json` bytes the tokenizer was loaded from.
///
/// Returns an owned NUL-terminated buffer (and writes its byte length to
/// `out_len` when non-null), or null on failure. The caller owns the buffer
/// and must release it with exactly one
/// [`marian_tok_free_buffer`] call; nothing else may free it.
///
/// # Safety
/// `out_len`, when non-null, must point to writable memory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_tok_get_config_json(
    handle: i64,
    out_len: *mut usize,
) -> *mut c_char {
    clear_last_error();

    let tokenizer = match live_tokenizer(handle) {
        Ok(tokenizer) => tokenizer,
        Err(_) => return std::ptr::null_mut(),
    };

    let Ok(buffer) = CString::new(tokenizer.raw_config_bytes().to_vec()) else {
        fail(
            MARIAN_ERR_INVALID_ARGUMENT,
            "config.json contains interior NUL bytes".to_string(),
        );
        return std::ptr::null_mut();
    };

    if !out_len.is_null() {
        unsafe { *out_len = buffer.as_bytes().len() };
    }
    buffer.into_raw()
}

/// Release a buffer returned by [`marian_tok_get_config_json`].
///
/// # Safety
/// `ptr` must be null or a pointer obtained from
/// [`marian_tok_get_config_json`] that has not been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_tok_free_buffer(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// Encode one source sentence into `out_ids`.
///
/// Returns the number of ids written (at most
/// `min(model_max_length, max_ids)`), or a negative error code. A result
/// exceeding `max_ids` after the silent `model_max_length` truncation is
/// [`MARIAN_ERR_BUFFER_TOO_SMALL`](crate::MARIAN_ERR_BUFFER_TOO_SMALL).
///
/// # Safety
/// `text` must be a NUL-terminated string and `out_ids` must point to at
/// least `max_ids` writable entries.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_tok_encode(
    handle: i64,
    text: *const c_char,
    out_ids: *mut i64,
    max_ids: c_int,
    add_eos: c_int,
) -> c_int {
    clear_last_error();

    let tokenizer = match live_tokenizer(handle) {
        Ok(tokenizer) => tokenizer,
        Err(code) => return code,
    };
    let text = match unsafe { cstr_arg(text, "text") } {
        Ok(text) => text,
        Err(code) => return code,
    };
    if out_ids.is_null() || max_ids <= 0 {
        return fail(
            MARIAN_ERR_INVALID_ARGUMENT,
            "out_ids must be non-null and max_ids positive".to_string(),
        );
    }

    let out = unsafe { std::slice::from_raw_parts_mut(out_ids, max_ids as usize) };
    match tokenizer.encode_into(text, add_eos != 0, out) {
        Ok(count) => count as c_int,
        Err(err) => fail_with(&err),
    }
}

/// Encode a batch of sentences into row-major buffers.
///
/// `texts` holds `batch` entries; null entries are legal and produce
/// length-0 rows whose stride contents are left untouched. `out_ids` holds
/// `batch * max_len` entries and `seq_lens` holds `batch` entries. Rows are
/// right-padded with the pad id.
///
/// Returns the maximum realized row length across the batch (not the
/// stride), or a negative error code; on failure no buffer is written.
///
/// # Safety
/// The pointers must cover the extents described above; each non-null text
/// must be NUL-terminated.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_tok_encode_batch(
    handle: i64,
    texts: *const *const c_char,
    batch: c_int,
    max_len: c_int,
    out_ids: *mut i64,
    seq_lens: *mut c_int,
    add_eos: c_int,
) -> c_int {
    clear_last_error();

    let tokenizer = match live_tokenizer(handle) {
        Ok(tokenizer) => tokenizer,
        Err(code) => return code,
    };
    if texts.is_null() || out_ids.is_null() || seq_lens.is_null() || batch <= 0 || max_len <= 0 {
        return fail(
            MARIAN_ERR_INVALID_ARGUMENT,
            "batch buffers must be non-null, batch and max_len positive".to_string(),
        );
    }
    let batch = batch as usize;
    let max_len = max_len as usize;

    let mut rows: Vec<Option<&str>> = Vec::with_capacity(batch);
    for i in 0..batch {
        let ptr = unsafe { *texts.add(i) };
        if ptr.is_null() {
            rows.push(None);
        } else {
            match unsafe { cstr_arg(ptr, "texts[]") } {
                Ok(text) => rows.push(Some(text)),
                Err(code) => return code,
            }
        }
    }

    let ids = unsafe { std::slice::from_raw_parts_mut(out_ids, batch * max_len) };
    let mut lens = vec![0usize; batch];

    match tokenizer.encode_batch_into(&rows, add_eos != 0, max_len, ids, &mut lens) {
        Ok(batch_max) => {
            let out_lens = unsafe { std::slice::from_raw_parts_mut(seq_lens, batch) };
            for (out, len) in out_lens.iter_mut().zip(&lens) {
                *out = *len as c_int;
            }
            batch_max as c_int
        }
        Err(err) => fail_with(&err),
    }
}

/// Fill a row-major attention mask: 1 below each row's clamped sequence
/// length, 0 elsewhere. Pure; no tokenizer handle involved.
///
/// Returns [`MARIAN_OK`](crate::MARIAN_OK) or a negative error code.
///
/// # Safety
/// `seq_lens` must hold `batch` entries and `out_mask` must hold
/// `batch * max_len` writable entries.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_tok_build_attention_mask(
    seq_lens: *const c_int,
    batch: c_int,
    max_len: c_int,
    out_mask: *mut c_int,
) -> c_int {
    clear_last_error();

    if seq_lens.is_null() || out_mask.is_null() || batch <= 0 || max_len <= 0 {
        return fail(
            MARIAN_ERR_INVALID_ARGUMENT,
            "mask buffers must be non-null, batch and max_len positive".to_string(),
        );
    }
    let batch = batch as usize;
    let max_len = max_len as usize;

    let lens: Vec<i64> = unsafe { std::slice::from_raw_parts(seq_lens, batch) }
        .iter()
        .map(|&len| i64::from(len))
        .collect();

    match mask::build_attention_mask(&lens, max_len) {
        Ok(bits) => {
            let out = unsafe { std::slice::from_raw_parts_mut(out_mask, batch * max_len) };
            for (out, bit) in out.iter_mut().zip(&bits) {
                *out = *bit as c_int;
            }
            MARIAN_OK
        }
        Err(err) => fail_with(&err),
    }
}

/// Decode external vocabulary ids into `out_text`.
///
/// With `skip_special` non-zero, eos / pad / unk ids are dropped first.
/// Unknown ids decode to the `<unk>` placeholder rather than failing; an
/// empty or fully-filtered input decodes to the empty string.
///
/// Returns the byte count written (terminator excluded), or a negative
/// error code. `max_len` must cover the result plus its terminator; the
/// capacity check runs after decoding, when the true size is known.
///
/// # Safety
/// `ids` must hold `len` entries; `out_text` must point to `max_len`
/// writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_tok_decode(
    handle: i64,
    ids: *const i64,
    len: c_int,
    skip_special: c_int,
    out_text: *mut c_char,
    max_len: c_int,
) -> c_int {
    clear_last_error();

    let tokenizer = match live_tokenizer(handle) {
        Ok(tokenizer) => tokenizer,
        Err(code) => return code,
    };
    if (ids.is_null() && len != 0) || len < 0 || out_text.is_null() || max_len <= 0 {
        return fail(
            MARIAN_ERR_INVALID_ARGUMENT,
            "decode buffers must be non-null, len non-negative, max_len positive".to_string(),
        );
    }

    let ids = if len == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(ids, len as usize) }
    };

    match tokenizer.decode(ids, skip_special != 0) {
        Ok(text) => unsafe { write_c_string(&text, out_text, max_len as usize) },
        Err(err) => fail_with(&err),
    }
}
