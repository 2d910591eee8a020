//! Boundary-contract checks that need no model files: argument
//! validation, handle lifecycle, error codes, and the pure mask builder.

use std::ffi::{CStr, CString};
use std::os::raw::c_int;

use marian_tokenizer_capi::{
    MARIAN_ERR_INVALID_ARGUMENT, MARIAN_ERR_INVALID_HANDLE, MARIAN_ERR_LOAD_FAILED, MARIAN_OK,
    subword_api, tokenizer_api,
};

fn last_error_text() -> Option<String> {
    let ptr = marian_tokenizer_capi::marian_tok_last_error();
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string())
    }
}

#[test]
fn test_new_rejects_null_and_missing_dir() {
    let handle = unsafe { tokenizer_api::marian_tok_new(std::ptr::null()) };
    assert_eq!(handle, i64::from(MARIAN_ERR_INVALID_ARGUMENT));

    let dir = CString::new("/no/such/model/dir").unwrap();
    let handle = unsafe { tokenizer_api::marian_tok_new(dir.as_ptr()) };
    assert_eq!(handle, i64::from(MARIAN_ERR_LOAD_FAILED));
    assert!(last_error_text().is_some());
}

#[test]
fn test_unknown_handles_are_rejected() {
    assert_eq!(tokenizer_api::marian_tok_free(424242), MARIAN_ERR_INVALID_HANDLE);
    assert_eq!(
        tokenizer_api::marian_tok_pad_id(424242),
        i64::from(MARIAN_ERR_INVALID_HANDLE)
    );
    assert_eq!(
        tokenizer_api::marian_tok_model_max_length(424242),
        i64::from(MARIAN_ERR_INVALID_HANDLE)
    );

    let mut out_len = 0usize;
    let config = unsafe { tokenizer_api::marian_tok_get_config_json(424242, &mut out_len) };
    assert!(config.is_null());
    assert!(last_error_text().unwrap().contains("not live"));

    let text = CString::new("hello").unwrap();
    let mut ids = [0i64; 8];
    let rc = unsafe {
        tokenizer_api::marian_tok_encode(424242, text.as_ptr(), ids.as_mut_ptr(), 8, 1)
    };
    assert_eq!(rc, MARIAN_ERR_INVALID_HANDLE);

    assert_eq!(subword_api::marian_sp_free(424242), MARIAN_ERR_INVALID_HANDLE);
}

#[test]
fn test_new_on_malformed_vocab_is_a_load_failure() {
    // A structurally broken directory file is a load failure, not an
    // invalid-argument error: the caller did nothing wrong.
    let dir = tempdir::TempDir::new("marian-capi").unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{
            "vocab_size": 10,
            "eos_token_id": 0,
            "pad_token_id": 9,
            "decoder_start_token_id": 9
        }"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("vocab.json"), "[1, 2, 3]").unwrap();

    let path = CString::new(dir.path().to_str().unwrap()).unwrap();
    let handle = unsafe { tokenizer_api::marian_tok_new(path.as_ptr()) };
    assert_eq!(handle, i64::from(MARIAN_ERR_LOAD_FAILED));
}

#[test]
fn test_sp_new_rejects_missing_file() {
    let path = CString::new("/no/such/model.spm").unwrap();
    let handle = unsafe { subword_api::marian_sp_new(path.as_ptr()) };
    assert_eq!(handle, i64::from(MARIAN_ERR_LOAD_FAILED));
}

#[test]
fn test_attention_mask_clamps_lengths() {
    let seq_lens: [c_int; 3] = [3, 0, 10];
    let mut mask = [7; 15];
    let rc = unsafe {
        tokenizer_api::marian_tok_build_attention_mask(seq_lens.as_ptr(), 3, 5, mask.as_mut_ptr())
    };
    assert_eq!(rc, MARIAN_OK);
    assert_eq!(
        mask,
        [
            1, 1, 1, 0, 0, //
            0, 0, 0, 0, 0, //
            1, 1, 1, 1, 1, //
        ]
    );
    assert!(last_error_text().is_none());
}

#[test]
fn test_attention_mask_rejects_bad_shapes() {
    let seq_lens: [c_int; 1] = [1];
    let mut mask = [0; 4];

    let rc = unsafe {
        tokenizer_api::marian_tok_build_attention_mask(
            std::ptr::null(),
            1,
            4,
            mask.as_mut_ptr(),
        )
    };
    assert_eq!(rc, MARIAN_ERR_INVALID_ARGUMENT);

    let rc = unsafe {
        tokenizer_api::marian_tok_build_attention_mask(seq_lens.as_ptr(), 0, 4, mask.as_mut_ptr())
    };
    assert_eq!(rc, MARIAN_ERR_INVALID_ARGUMENT);

    let rc = unsafe {
        tokenizer_api::marian_tok_build_attention_mask(
            seq_lens.as_ptr(),
            1,
            -3,
            mask.as_mut_ptr(),
        )
    };
    assert_eq!(rc, MARIAN_ERR_INVALID_ARGUMENT);
    assert!(last_error_text().is_some());
}

#[test]
fn test_last_error_clears_on_success() {
    let rc = tokenizer_api::marian_tok_free(424242);
    assert_eq!(rc, MARIAN_ERR_INVALID_HANDLE);
    assert!(last_error_text().is_some());

    let seq_lens: [c_int; 1] = [2];
    let mut mask = [0; 4];
    let rc = unsafe {
        tokenizer_api::marian_tok_build_attention_mask(seq_lens.as_ptr(), 1, 4, mask.as_mut_ptr())
    };
    assert_eq!(rc, MARIAN_OK);
    assert!(last_error_text().is_none());
}

#[test]
fn test_free_buffer_accepts_null() {
    unsafe { tokenizer_api::marian_tok_free_buffer(std::ptr::null_mut()) };
}
