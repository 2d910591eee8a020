//! # SentencePiece Backend

use std::path::Path;

use sentencepiece::SentencePieceProcessor;

use crate::{
    errors::{MTError, MTResult},
    subword::SubwordModel,
};

/// A [`SubwordModel`] backed by a loaded SentencePiece `.spm` model.
pub struct SentencePieceModel {
    inner: SentencePieceProcessor,
}

impl SentencePieceModel {
    /// Load a serialized SentencePiece model from disk.
    ///
    /// ## Arguments
    /// * `path` - Path to the `.spm` file.
    ///
    /// ## Returns
    /// The loaded model, or [`MTError::ModelLoad`] if the file is absent or
    /// malformed.
    pub fn from_file(path: &Path) -> MTResult<Self> {
        let inner = SentencePieceProcessor::open(path)
            .map_err(|e| MTError::ModelLoad(format!("{}: {e}", path.display())))?;
        Ok(Self { inner })
    }

    /// The size of the model's internal piece vocabulary.
    pub fn vocab_size(&self) -> usize {
        self.inner.len()
    }
}

impl SubwordModel for SentencePieceModel {
    fn encode_pieces(
        &self,
        text: &str,
    ) -> MTResult<Vec<String>> {
        let pieces = self
            .inner
            .encode(text)
            .map_err(|e| MTError::Segmentation(e.to_string()))?;
        Ok(pieces.into_iter().map(|p| p.piece).collect())
    }

    fn decode_pieces(
        &self,
        pieces: &[String],
    ) -> MTResult<String> {
        // Route through the internal id space: pieces unknown to this model
        // become its own unk piece, matching the processor's surface rules.
        let mut ids = Vec::with_capacity(pieces.len());
        for piece in pieces {
            let id = self
                .inner
                .piece_to_id(piece)
                .map_err(|e| MTError::Segmentation(e.to_string()))?
                .unwrap_or_else(|| self.inner.unk_id());
            ids.push(id);
        }

        self.inner
            .decode_piece_ids(&ids)
            .map_err(|e| MTError::Segmentation(e.to_string()))
    }

    fn encode_ids(
        &self,
        text: &str,
    ) -> MTResult<Vec<u32>> {
        let pieces = self
            .inner
            .encode(text)
            .map_err(|e| MTError::Segmentation(e.to_string()))?;
        Ok(pieces.into_iter().map(|p| p.id).collect())
    }

    fn id_to_piece(
        &self,
        id: u32,
    ) -> MTResult<String> {
        if id as usize >= self.inner.len() {
            return Err(MTError::InvalidArgument(format!(
                "piece id {id} out of range for model of size {}",
                self.inner.len()
            )));
        }

        // Decoding a single id yields the piece's surface text.
        self.inner
            .decode_piece_ids(&[id])
            .map_err(|e| MTError::Segmentation(e.to_string()))
    }
}
