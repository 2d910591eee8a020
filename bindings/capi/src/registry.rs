//! # Handle Registry
//!
//! Owned aggregates behind opaque integer handles. Handles are never
//! reused within a process run, so a freed handle stays invalid instead of
//! silently aliasing a newer instance.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use marian_tokenizer::{MarianTokenizer, SubwordTokenizer};

/// A process-wide map from opaque handles to owned instances.
pub struct HandleRegistry<T> {
    next: AtomicI64,
    entries: RwLock<HashMap<i64, Arc<T>>>,
}

impl<T> HandleRegistry<T> {
    fn new() -> Self {
        Self {
            // Handle 0 is never issued; it reads as "no handle" in C.
            next: AtomicI64::new(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register an instance, returning its new positive handle.
    pub fn insert(
        &self,
        value: T,
    ) -> i64 {
        let handle = self.next.fetch_add(1, Ordering::Relaxed);
        self.entries.write().insert(handle, Arc::new(value));
        handle
    }

    /// Look up a live instance.
    ///
    /// The returned [`Arc`] keeps the instance alive for the duration of
    /// the call even if another thread frees the handle concurrently.
    pub fn get(
        &self,
        handle: i64,
    ) -> Option<Arc<T>> {
        self.entries.read().get(&handle).cloned()
    }

    /// Invalidate a handle. Returns false if it was not live.
    pub fn remove(
        &self,
        handle: i64,
    ) -> bool {
        self.entries.write().remove(&handle).is_some()
    }
}

/// The tokenizer-instance registry.
pub static TOKENIZERS: Lazy<HandleRegistry<MarianTokenizer>> = Lazy::new(HandleRegistry::new);

/// The passthrough-instance registry.
pub static SUBWORDS: Lazy<HandleRegistry<SubwordTokenizer>> = Lazy::new(HandleRegistry::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_not_reused() {
        let registry: HandleRegistry<u8> = HandleRegistry::new();
        let a = registry.insert(1);
        assert!(registry.remove(a));
        let b = registry.insert(2);
        assert_ne!(a, b);
        assert!(registry.get(a).is_none());
        assert_eq!(*registry.get(b).unwrap(), 2);
    }

    #[test]
    fn test_remove_twice() {
        let registry: HandleRegistry<u8> = HandleRegistry::new();
        let h = registry.insert(1);
        assert!(registry.remove(h));
        assert!(!registry.remove(h));
    }
}
