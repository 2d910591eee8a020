//! # C API for the Marian Tokenizer
//!
//! The boundary surface for embedding languages: opaque integer handles,
//! caller-owned fixed-capacity buffers with explicit capacity arguments,
//! and negative error codes.
//!
//! ## Conventions
//!
//! * Handles are positive `i64` values drawn from a process-wide registry.
//!   [`tokenizer_api::marian_tok_free`] / [`subword_api::marian_sp_free`]
//!   invalidate a handle; later use of it returns
//!   [`MARIAN_ERR_INVALID_HANDLE`] rather than touching freed state.
//! * Every count-returning function returns a negative error code on
//!   failure; callers must treat `>= 0` as success. Kinds are distinguished
//!   by code only; [`marian_tok_last_error`] is diagnostic text, not
//!   contract.
//! * Output buffers are never written on failure. Text outputs are
//!   NUL-terminated and their declared capacity must cover the terminator.
//! * The buffer returned by [`tokenizer_api::marian_tok_get_config_json`]
//!   is owned by the caller and must be released with
//!   [`tokenizer_api::marian_tok_free_buffer`]; no other buffer crosses the
//!   boundary owned.

#![warn(missing_docs, unused)]

pub mod registry;
pub mod subword_api;
pub mod tokenizer_api;

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::{c_char, c_int};

use marian_tokenizer::MTError;

/// Success.
pub const MARIAN_OK: c_int = 0;
/// Null/malformed argument, non-positive size, stride, or batch.
pub const MARIAN_ERR_INVALID_ARGUMENT: c_int = -1;
/// A model directory file is missing, unreadable, or unparseable.
pub const MARIAN_ERR_LOAD_FAILED: c_int = -2;
/// The subword model rejected its input.
pub const MARIAN_ERR_SEGMENTATION: c_int = -3;
/// The true output size exceeds the caller-declared capacity.
pub const MARIAN_ERR_BUFFER_TOO_SMALL: c_int = -4;
/// The handle is unknown or already freed.
pub const MARIAN_ERR_INVALID_HANDLE: c_int = -5;

/// Map a core error to its boundary code.
pub fn error_code(err: &MTError) -> c_int {
    match err {
        MTError::Io(_)
        | MTError::Json(_)
        | MTError::MissingField { .. }
        | MTError::MalformedVocab(_)
        | MTError::NegativeVocabId { .. }
        | MTError::ModelLoad(_) => MARIAN_ERR_LOAD_FAILED,
        MTError::Segmentation(_) => MARIAN_ERR_SEGMENTATION,
        MTError::BufferTooSmall { .. } => MARIAN_ERR_BUFFER_TOO_SMALL,
        MTError::InvalidArgument(_) => MARIAN_ERR_INVALID_ARGUMENT,
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|slot| slot.borrow_mut().take());
}

pub(crate) fn set_last_error(message: String) {
    log::debug!("capi error: {message}");
    let cstring = CString::new(message).unwrap_or_default();
    LAST_ERROR.with(|slot| slot.borrow_mut().replace(cstring));
}

pub(crate) fn fail(
    code: c_int,
    message: String,
) -> c_int {
    set_last_error(message);
    code
}

pub(crate) fn fail_with(err: &MTError) -> c_int {
    fail(error_code(err), err.to_string())
}

/// Borrow a required C-string argument.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string live for the call.
pub(crate) unsafe fn cstr_arg<'a>(
    ptr: *const c_char,
    what: &str,
) -> Result<&'a str, c_int> {
    if ptr.is_null() {
        return Err(fail(
            MARIAN_ERR_INVALID_ARGUMENT,
            format!("{what} must not be null"),
        ));
    }
    unsafe { std::ffi::CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|e| {
            fail(
                MARIAN_ERR_INVALID_ARGUMENT,
                format!("{what} is not valid UTF-8: {e}"),
            )
        })
}

/// Copy `text` plus a NUL terminator into a caller buffer of `capacity`
/// bytes, returning the byte count written (terminator excluded).
///
/// # Safety
/// `out` must point to at least `capacity` writable bytes.
pub(crate) unsafe fn write_c_string(
    text: &str,
    out: *mut c_char,
    capacity: usize,
) -> c_int {
    let bytes = text.as_bytes();
    if bytes.len() + 1 > capacity {
        return fail_with(&MTError::BufferTooSmall {
            required: bytes.len() + 1,
            capacity,
        });
    }
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), out.cast::<u8>(), bytes.len());
        *out.add(bytes.len()) = 0;
    }
    bytes.len() as c_int
}

/// Diagnostic text for the calling thread's most recent failure.
///
/// Returns null when the last call on this thread succeeded. The pointer is
/// valid until the next API call on the same thread; callers must not free
/// it.
#[unsafe(no_mangle)]
pub extern "C" fn marian_tok_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |msg| msg.as_ptr())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{ broken").unwrap_err()
    }

    #[test]
    fn test_error_code_covers_every_variant() {
        // Construction failures all collapse to the load code; the other
        // kinds each keep their own code, so callers can tell a capacity
        // violation from a segmentation failure from a caller bug.
        let load_failures = [
            MTError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
            MTError::Json(json_error()),
            MTError::MissingField { field: "eos_token_id" },
            MTError::MalformedVocab("not an object".to_string()),
            MTError::NegativeVocabId {
                token: "a".to_string(),
                id: -2,
            },
            MTError::ModelLoad("truncated".to_string()),
        ];
        for err in &load_failures {
            assert_eq!(error_code(err), MARIAN_ERR_LOAD_FAILED, "{err}");
        }

        assert_eq!(
            error_code(&MTError::Segmentation("rejected".to_string())),
            MARIAN_ERR_SEGMENTATION
        );
        assert_eq!(
            error_code(&MTError::BufferTooSmall {
                required: 9,
                capacity: 4,
            }),
            MARIAN_ERR_BUFFER_TOO_SMALL
        );
        assert_eq!(
            error_code(&MTError::InvalidArgument("zero stride".to_string())),
            MARIAN_ERR_INVALID_ARGUMENT
        );
    }

    #[test]
    fn test_error_codes_are_distinct_and_negative() {
        let codes = [
            MARIAN_ERR_INVALID_ARGUMENT,
            MARIAN_ERR_LOAD_FAILED,
            MARIAN_ERR_SEGMENTATION,
            MARIAN_ERR_BUFFER_TOO_SMALL,
            MARIAN_ERR_INVALID_HANDLE,
        ];
        for (i, &code) in codes.iter().enumerate() {
            assert!(code < MARIAN_OK);
            for &other in &codes[i + 1..] {
                assert_ne!(code, other);
            }
        }
    }
}
