//! # Subword Segmentation Capability
//!
//! The tokenizer core does not implement subword segmentation; it consumes
//! it through the [`SubwordModel`] trait. A Marian tokenizer owns two
//! independently loaded, independently substitutable instances (source side,
//! target side).
//!
//! The trait spans two id spaces that must not be confused:
//! * piece strings, produced and consumed by `encode_pieces` /
//!   `decode_pieces` — these are what the vocabulary table maps to external
//!   ids;
//! * the model's own internal `u32` piece ids (`encode_ids`, `id_to_piece`),
//!   used only by the raw passthrough surface. They are unrelated to
//!   [`TokenId`](crate::types::TokenId) values.

#[cfg(feature = "spm")]
pub mod sentencepiece_model;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(feature = "spm")]
#[doc(inline)]
pub use sentencepiece_model::SentencePieceModel;

use crate::errors::MTResult;

/// A loaded subword segmentation model.
///
/// Implementations are read-only after construction. Every method is a pure
/// function of the loaded model and its arguments; failures are propagated,
/// never retried.
pub trait SubwordModel: Send + Sync {
    /// Segment text into subword piece strings.
    ///
    /// Deterministic for a given loaded model. Fails with
    /// [`MTError::Segmentation`](crate::errors::MTError::Segmentation) if the
    /// model rejects the input.
    fn encode_pieces(
        &self,
        text: &str,
    ) -> MTResult<Vec<String>>;

    /// Join piece strings back into text.
    ///
    /// The inverse direction; fails analogously to
    /// [`encode_pieces`](Self::encode_pieces).
    fn decode_pieces(
        &self,
        pieces: &[String],
    ) -> MTResult<String>;

    /// Segment text into the model's internal piece ids.
    fn encode_ids(
        &self,
        text: &str,
    ) -> MTResult<Vec<u32>>;

    /// Resolve one internal piece id to text.
    ///
    /// Out-of-range ids are an
    /// [`InvalidArgument`](crate::errors::MTError::InvalidArgument) error.
    fn id_to_piece(
        &self,
        id: u32,
    ) -> MTResult<String>;
}
