//! # Common Types

/// An external vocabulary id, in the target model's own numbering scheme.
///
/// These are the values found in `vocab.json`, and the values written into
/// model input buffers. They are distinct from the segmentation model's
/// internal piece ids (which are `u32`, and never leave the subword layer).
///
/// Ids are signed so that the same width works for id buffers and for the
/// negative error codes used at the C boundary.
pub type TokenId = i64;

/// The literal token reserved for unknown pieces.
pub const UNK_TOKEN: &str = "<unk>";

/// The external id assumed for [`UNK_TOKEN`] when the vocabulary does not bind it.
pub const DEFAULT_UNK_ID: TokenId = 1;

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type MTHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> MTHashMap<K, V> {
            MTHashMap::with_capacity(capacity)
        }

        /// Type Alias for hash sets in this crate.
        pub type MTHashSet<V> = ahash::AHashSet<V>;
    } else {
        /// Type Alias for hash maps in this crate.
        pub type MTHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> MTHashMap<K, V> {
            MTHashMap::with_capacity(capacity)
        }

        /// Type Alias for hash sets in this crate.
        pub type MTHashSet<V> = std::collections::HashSet<V>;
    }
}

/// Static check that a type is `Send`.
pub fn check_is_send<T: Send>() {}

/// Static check that a type is `Sync`.
pub fn check_is_sync<T: Sync>() {}
