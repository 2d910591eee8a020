//! # Subword Passthrough Surface
//!
//! `marian_sp_*`: raw SentencePiece operations over a single model file.
//! The ids crossing this surface are the model's internal piece ids, not
//! the external vocabulary ids the `marian_tok_*` surface speaks.

use std::os::raw::{c_char, c_int};
use std::sync::Arc;

use marian_tokenizer::SubwordTokenizer;

use crate::{
    MARIAN_ERR_INVALID_ARGUMENT, MARIAN_ERR_INVALID_HANDLE, MARIAN_OK, clear_last_error,
    cstr_arg, fail, fail_with, registry::SUBWORDS, write_c_string,
};

fn live_subword(handle: i64) -> Result<Arc<SubwordTokenizer>, c_int> {
    SUBWORDS.get(handle).ok_or_else(|| {
        fail(
            MARIAN_ERR_INVALID_HANDLE,
            format!("subword handle {handle} is not live"),
        )
    })
}

/// Load a single SentencePiece model file.
///
/// Returns a positive handle, or a negative error code.
///
/// # Safety
/// `path` must be null or a NUL-terminated string live for the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_sp_new(path: *const c_char) -> i64 {
    clear_last_error();

    let path = match unsafe { cstr_arg(path, "path") } {
        Ok(path) => path,
        Err(code) => return i64::from(code),
    };

    match SubwordTokenizer::from_file(path) {
        Ok(subword) => SUBWORDS.insert(subword),
        Err(err) => i64::from(fail_with(&err)),
    }
}

/// Release a subword tokenizer. The handle is invalid afterwards.
#[unsafe(no_mangle)]
pub extern "C" fn marian_sp_free(handle: i64) -> c_int {
    clear_last_error();
    if SUBWORDS.remove(handle) {
        MARIAN_OK
    } else {
        fail(
            MARIAN_ERR_INVALID_HANDLE,
            format!("subword handle {handle} is not live"),
        )
    }
}

/// Segment text into internal piece ids written to `out_ids`.
///
/// Returns the number of ids written, or a negative error code.
///
/// # Safety
/// `text` must be a NUL-terminated string and `out_ids` must point to at
/// least `max_ids` writable entries.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_sp_encode_as_ids(
    handle: i64,
    text: *const c_char,
    out_ids: *mut c_int,
    max_ids: c_int,
) -> c_int {
    clear_last_error();

    let subword = match live_subword(handle) {
        Ok(subword) => subword,
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

    let mut ids = vec![0u32; max_ids as usize];
    match subword.encode_ids_into(text, &mut ids) {
        Ok(count) => {
            let out = unsafe { std::slice::from_raw_parts_mut(out_ids, count) };
            for (out, id) in out.iter_mut().zip(&ids[..count]) {
                *out = *id as c_int;
            }
            count as c_int
        }
        Err(err) => fail_with(&err),
    }
}

/// Resolve one internal piece id to its surface text.
///
/// Returns the byte count written (terminator excluded), or a negative
/// error code. Ids outside the model's piece range are
/// [`MARIAN_ERR_INVALID_ARGUMENT`](crate::MARIAN_ERR_INVALID_ARGUMENT).
///
/// # Safety
/// `out_buf` must point to at least `max_len` writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_sp_id_to_piece(
    handle: i64,
    id: c_int,
    out_buf: *mut c_char,
    max_len: c_int,
) -> c_int {
    clear_last_error();

    let subword = match live_subword(handle) {
        Ok(subword) => subword,
        Err(code) => return code,
    };
    if id < 0 || out_buf.is_null() || max_len <= 0 {
        return fail(
            MARIAN_ERR_INVALID_ARGUMENT,
            "id must be non-negative, out_buf non-null, max_len positive".to_string(),
        );
    }

    match subword.id_to_piece(id as u32) {
        Ok(piece) => unsafe { write_c_string(&piece, out_buf, max_len as usize) },
        Err(err) => fail_with(&err),
    }
}

/// Join piece strings back into text written to `out_buf`.
///
/// Returns the byte count written (terminator excluded), or a negative
/// error code. A zero-length piece array decodes to the empty string.
///
/// # Safety
/// `pieces` must hold `len` NUL-terminated strings; `out_buf` must point to
/// at least `max_len` writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marian_sp_decode_pieces(
    handle: i64,
    pieces: *const *const c_char,
    len: c_int,
    out_buf: *mut c_char,
    max_len: c_int,
) -> c_int {
    clear_last_error();

    let subword = match live_subword(handle) {
        Ok(subword) => subword,
        Err(code) => return code,
    };
    if (pieces.is_null() && len != 0) || len < 0 || out_buf.is_null() || max_len <= 0 {
        return fail(
            MARIAN_ERR_INVALID_ARGUMENT,
            "pieces must cover len entries, out_buf non-null, max_len positive".to_string(),
        );
    }

    let mut owned: Vec<String> = Vec::with_capacity(len as usize);
    for i in 0..len as usize {
        let ptr = unsafe { *pieces.add(i) };
        match unsafe { cstr_arg(ptr, "pieces[]") } {
            Ok(piece) => owned.push(piece.to_string()),
            Err(code) => return code,
        }
    }

    match subword.decode_pieces(&owned) {
        Ok(text) => unsafe { write_c_string(&text, out_buf, max_len as usize) },
        Err(err) => fail_with(&err),
    }
}
