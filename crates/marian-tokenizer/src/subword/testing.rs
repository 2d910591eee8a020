//! # Test Subword Models
//!
//! A deterministic, dependency-free [`SubwordModel`] for exercising the
//! translation layer without a native SentencePiece build. Pieces are
//! whitespace-split words; the round trip is lossless for single-spaced
//! text.

use crate::{
    errors::{MTError, MTResult},
    subword::SubwordModel,
    types::MTHashMap,
};

/// A whitespace-splitting mock subword model.
#[derive(Debug, Default)]
pub struct WhitespaceModel {
    /// Internal id space: position in this list is the piece's id.
    pieces: Vec<String>,
    index: MTHashMap<String, u32>,

    /// When set, any input containing this substring fails segmentation.
    poison: Option<String>,
}

impl WhitespaceModel {
    /// Create a model with an empty internal piece vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model with the given internal piece vocabulary.
    ///
    /// Unknown pieces encode to internal id 0, so callers that care about
    /// id lookups should reserve slot 0 for an unk marker.
    pub fn with_pieces<I, S>(pieces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pieces: Vec<String> = pieces.into_iter().map(Into::into).collect();
        let index = pieces
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i as u32))
            .collect();
        Self {
            pieces,
            index,
            poison: None,
        }
    }

    /// Make any input containing `marker` fail with a segmentation error.
    pub fn with_poison(
        mut self,
        marker: &str,
    ) -> Self {
        self.poison = Some(marker.to_string());
        self
    }

    fn check_poison(
        &self,
        text: &str,
    ) -> MTResult<()> {
        if let Some(marker) = &self.poison
            && text.contains(marker.as_str())
        {
            return Err(MTError::Segmentation(format!(
                "poisoned input (contains {marker:?})"
            )));
        }
        Ok(())
    }
}

impl SubwordModel for WhitespaceModel {
    fn encode_pieces(
        &self,
        text: &str,
    ) -> MTResult<Vec<String>> {
        self.check_poison(text)?;
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    fn decode_pieces(
        &self,
        pieces: &[String],
    ) -> MTResult<String> {
        for piece in pieces {
            self.check_poison(piece)?;
        }
        Ok(pieces.join(" "))
    }

    fn encode_ids(
        &self,
        text: &str,
    ) -> MTResult<Vec<u32>> {
        Ok(self
            .encode_pieces(text)?
            .iter()
            .map(|p| self.index.get(p).copied().unwrap_or(0))
            .collect())
    }

    fn id_to_piece(
        &self,
        id: u32,
    ) -> MTResult<String> {
        self.pieces.get(id as usize).cloned().ok_or_else(|| {
            MTError::InvalidArgument(format!(
                "piece id {id} out of range for model of size {}",
                self.pieces.len()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_roundtrip() {
        let model = WhitespaceModel::new();
        let pieces = model.encode_pieces("hello round trip").unwrap();
        assert_eq!(pieces, vec!["hello", "round", "trip"]);
        assert_eq!(model.decode_pieces(&pieces).unwrap(), "hello round trip");
    }

    #[test]
    fn test_internal_ids() {
        let model = WhitespaceModel::with_pieces(["<unk>", "hello", "world"]);
        assert_eq!(model.encode_ids("world hello mars").unwrap(), vec![2, 1, 0]);
        assert_eq!(model.id_to_piece(1).unwrap(), "hello");
        assert!(matches!(
            model.id_to_piece(3),
            Err(MTError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_poison() {
        let model = WhitespaceModel::new().with_poison("\u{fffd}");
        assert!(matches!(
            model.encode_pieces("bad \u{fffd} input"),
            Err(MTError::Segmentation(_))
        ));
        assert!(model.encode_pieces("good input").is_ok());
    }
}
