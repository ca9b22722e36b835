//! Typed JSON access over any [`KvStore`].

use serde::Serialize;

use crate::{KvResult, KvStore};

/// Backend wrapper that serializes values to JSON on write.
///
/// Reads return the raw string; callers own the decoding so they can tell a
/// corrupt value apart from a storage failure.
///
/// ```rust,ignore
/// let store = Store::new(MemoryStore::new());
/// store.set_json("techstore_cart", &cart)?;
/// let raw: Option<String> = store.get_raw("techstore_cart")?;
/// ```
#[derive(Debug)]
pub struct Store<S> {
    backend: S,
}

impl<S: KvStore> Store<S> {
    /// Wrap a backend.
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Borrow the underlying backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Get the raw string value.
    pub fn get_raw(&self, key: &str) -> KvResult<Option<String>> {
        self.backend.get(key)
    }

    /// Serialize and store a value.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> KvResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }
}
