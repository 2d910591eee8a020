//! # `marian-tokenizer` — SentencePiece to Marian Adapter
//!
//! This crate bridges SentencePiece subword segmentation to a Marian-style
//! sequence-to-sequence model's vocabulary and batching conventions.
//!
//! A model directory holds four files, all required:
//! * `config.json` — vocab sizes, special-token ids, length limits;
//! * `vocab.json` — the target model's token -> external-id table
//!   (sparse and non-contiguous ids are legal);
//! * `source.spm` / `target.spm` — two independently trained SentencePiece
//!   models, one per translation side.
//!
//! See:
//! * [`tokenizer`] for the encode / decode / batch operations.
//! * [`mask`] for stateless attention-mask construction.
//! * [`passthrough`] for raw single-model subword access.
//! * [`config`] and [`vocab`] for the model-file loaders.
//!
//! ```rust,ignore
//! use marian_tokenizer::MarianTokenizer;
//! use marian_tokenizer::mask::build_attention_mask;
//!
//! let tok = MarianTokenizer::from_dir("models/opus-mt-en-de")?;
//!
//! let ids = tok.encode("Hello world", true)?;
//! let text = tok.decode(&ids, true)?;
//!
//! let mut batch = vec![0i64; 2 * 64];
//! let mut lens = vec![0usize; 2];
//! let used = tok.encode_batch_into(
//!     &[Some("Hello"), Some("World")], true, 64, &mut batch, &mut lens)?;
//! let mask = build_attention_mask(
//!     &lens.iter().map(|&n| n as i64).collect::<Vec<_>>(), 64)?;
//! ```
//!
//! ## Crate Features
//!
//! #### feature: ``ahash`` (default)
//!
//! Swaps all HashMap/HashSet implementations for ``ahash``; a performance
//! win on many/(most?) modern CPUs. See the ``types::MTHash{*}`` aliases.
//!
//! #### feature: ``spm``
//!
//! Enables the ``sentencepiece``-backed segmentation backend, and with it
//! [`MarianTokenizer::from_dir`] and
//! [`passthrough::SubwordTokenizer::from_file`]. Off by default because it
//! requires the native SentencePiece library build; everything else in the
//! crate — including its tests — runs without it, against the
//! [`subword::SubwordModel`] capability trait.
//!
//! #### feature: ``rayon``
//!
//! Enables [`rayon::par_encode_batch_into`], a parallel compute phase for
//! batch encoding with the same contract as the sequential operation.
//!
//! #### feature: ``testing``
//!
//! Exposes [`subword::testing`] (the whitespace mock model) to downstream
//! users.
#![warn(missing_docs, unused)]

#[cfg(feature = "rayon")]
pub mod rayon;

pub mod config;
pub mod errors;
pub mod mask;
pub mod passthrough;
pub mod subword;
pub mod tokenizer;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use config::TokenizerConfig;
#[doc(inline)]
pub use errors::{MTError, MTResult};
#[doc(inline)]
pub use passthrough::SubwordTokenizer;
#[doc(inline)]
pub use subword::SubwordModel;
#[doc(inline)]
pub use tokenizer::MarianTokenizer;
#[doc(inline)]
pub use types::TokenId;
#[doc(inline)]
pub use vocab::VocabTable;
