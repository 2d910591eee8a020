//! # Vocabulary Table
//!
//! Loader for the `vocab.json` file of a Marian model directory: a flat JSON
//! object mapping token strings to external vocabulary ids.
//!
//! The table is bidirectional:
//! * forward: token string -> id, a hash map built directly from the file;
//! * reverse: a dense array indexed by id, sized to `max_id + 1`, with empty
//!   strings in the slots no token maps to. Ids are not required to be
//!   contiguous; gaps are legal.
//!
//! When two tokens map to the same id, the last write into the reverse table
//! wins. Which token that is follows the forward map's iteration order and
//! is deliberately left unspecified; exported vocabularies that do this are
//! tolerated, not rejected.

use serde_json::Value;

use crate::{
    errors::{MTError, MTResult},
    types::{DEFAULT_UNK_ID, MTHashMap, TokenId, UNK_TOKEN, hash_map_with_capacity},
};

/// A bidirectional token-string <-> external-id table.
#[derive(Debug, Clone, Default)]
pub struct VocabTable {
    /// token string -> external id.
    forward: MTHashMap<String, TokenId>,

    /// external id -> token string; empty string marks an unmapped slot.
    reverse: Vec<String>,

    /// The id bound to `<unk>`, or [`DEFAULT_UNK_ID`] if unbound.
    unk_id: TokenId,
}

impl VocabTable {
    /// Parse a `vocab.json` byte buffer.
    ///
    /// Any JSON syntax error, non-object document, non-integer id, or
    /// negative id fails the whole load; no partial table is returned.
    ///
    /// ## Arguments
    /// * `bytes` - The raw file contents.
    ///
    /// ## Returns
    /// The loaded table, or an error.
    pub fn from_slice(bytes: &[u8]) -> MTResult<Self> {
        let doc: Value = serde_json::from_slice(bytes)?;
        let entries = doc
            .as_object()
            .ok_or_else(|| MTError::MalformedVocab("document is not a JSON object".to_string()))?;

        let mut forward: MTHashMap<String, TokenId> = hash_map_with_capacity(entries.len());
        let mut max_id: TokenId = -1;

        for (token, value) in entries {
            let id = value.as_i64().ok_or_else(|| {
                MTError::MalformedVocab(format!("token {token:?} maps to non-integer id {value}"))
            })?;
            if id < 0 {
                return Err(MTError::NegativeVocabId {
                    token: token.clone(),
                    id,
                });
            }

            max_id = max_id.max(id);
            forward.insert(token.clone(), id);
        }

        // max_id stays -1 for an empty vocabulary: the reverse table is empty.
        let mut reverse = vec![String::new(); (max_id + 1) as usize];
        for (token, &id) in &forward {
            let slot = &mut reverse[id as usize];
            if !slot.is_empty() {
                log::warn!("vocab.json: duplicate id {id} ({slot:?} and {token:?})");
            }
            slot.clear();
            slot.push_str(token);
        }

        let unk_id = forward.get(UNK_TOKEN).copied().unwrap_or(DEFAULT_UNK_ID);

        Ok(Self {
            forward,
            reverse,
            unk_id,
        })
    }

    /// Look up the external id of a token string.
    pub fn token_to_id(
        &self,
        token: &str,
    ) -> Option<TokenId> {
        self.forward.get(token).copied()
    }

    /// Look up the token string of an external id.
    ///
    /// ## Returns
    /// `None` for ids outside `[0, max_id]`, and for in-range ids with no
    /// mapped token.
    pub fn id_to_token(
        &self,
        id: TokenId,
    ) -> Option<&str> {
        if id < 0 {
            return None;
        }
        match self.reverse.get(id as usize) {
            Some(token) if !token.is_empty() => Some(token),
            _ => None,
        }
    }

    /// The id bound to the literal `<unk>` token.
    ///
    /// Falls back to [`DEFAULT_UNK_ID`] when the vocabulary does not bind it.
    pub fn unk_id(&self) -> TokenId {
        self.unk_id
    }

    /// The number of distinct token strings in the table.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether the table holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The length of the dense reverse table (`max_id + 1`, or 0 when empty).
    pub fn reverse_len(&self) -> usize {
        self.reverse.len()
    }
}
