//! # Stateless Subword Passthrough
//!
//! A second, independent entry point: raw subword operations over a single
//! model, with no external vocabulary indirection and no special-token
//! logic. Used when only the segmentation capability is needed — the ids
//! here are the subword model's *internal* ids, not
//! [`TokenId`](crate::types::TokenId) values, and the two are not
//! interchangeable.

use crate::{
    errors::{MTError, MTResult},
    subword::SubwordModel,
};

/// A single-model raw subword tokenizer.
pub struct SubwordTokenizer {
    model: Box<dyn SubwordModel>,
}

impl SubwordTokenizer {
    /// Wrap an already-loaded subword model.
    pub fn from_model(model: Box<dyn SubwordModel>) -> Self {
        Self { model }
    }

    /// Load a single SentencePiece model file.
    #[cfg(feature = "spm")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> MTResult<Self> {
        let model = crate::subword::SentencePieceModel::from_file(path.as_ref())?;
        Ok(Self::from_model(Box::new(model)))
    }

    /// Segment text into piece strings.
    pub fn encode_pieces(
        &self,
        text: &str,
    ) -> MTResult<Vec<String>> {
        self.model.encode_pieces(text)
    }

    /// Join piece strings back into text.
    pub fn decode_pieces(
        &self,
        pieces: &[String],
    ) -> MTResult<String> {
        self.model.decode_pieces(pieces)
    }

    /// Segment text into the model's internal piece ids.
    pub fn encode_ids(
        &self,
        text: &str,
    ) -> MTResult<Vec<u32>> {
        self.model.encode_ids(text)
    }

    /// Segment text into internal piece ids, written to a caller buffer.
    ///
    /// ## Returns
    /// The number of ids written, or [`MTError::BufferTooSmall`].
    pub fn encode_ids_into(
        &self,
        text: &str,
        out: &mut [u32],
    ) -> MTResult<usize> {
        let ids = self.encode_ids(text)?;
        if ids.len() > out.len() {
            return Err(MTError::BufferTooSmall {
                required: ids.len(),
                capacity: out.len(),
            });
        }
        out[..ids.len()].copy_from_slice(&ids);
        Ok(ids.len())
    }

    /// Resolve one internal piece id to text.
    pub fn id_to_piece(
        &self,
        id: u32,
    ) -> MTResult<String> {
        self.model.id_to_piece(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subword::testing::WhitespaceModel;

    fn build() -> SubwordTokenizer {
        SubwordTokenizer::from_model(Box::new(WhitespaceModel::with_pieces([
            "<unk>", "alpha", "beta",
        ])))
    }

    #[test]
    fn test_piece_roundtrip() {
        let sp = build();
        let pieces = sp.encode_pieces("alpha beta gamma").unwrap();
        assert_eq!(pieces, vec!["alpha", "beta", "gamma"]);
        assert_eq!(sp.decode_pieces(&pieces).unwrap(), "alpha beta gamma");
    }

    #[test]
    fn test_internal_ids() {
        let sp = build();
        assert_eq!(sp.encode_ids("beta alpha").unwrap(), vec![2, 1]);
        assert_eq!(sp.id_to_piece(2).unwrap(), "beta");
        assert!(matches!(
            sp.id_to_piece(9),
            Err(MTError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encode_ids_into() {
        let sp = build();
        let mut out = [0u32; 2];
        assert_eq!(sp.encode_ids_into("beta alpha", &mut out).unwrap(), 2);
        assert_eq!(out, [2, 1]);

        let mut small = [0u32; 1];
        assert!(matches!(
            sp.encode_ids_into("beta alpha", &mut small),
            Err(MTError::BufferTooSmall { .. })
        ));
    }
}
