//! Durable key-value storage for the TechStore client.
//!
//! Provides the [`KvStore`] trait the cart persists through, plus an
//! in-memory backend for tests and a file backend for the CLI.
//!
//! # Example
//!
//! ```rust,ignore
//! use techstore_kv::{FileStore, KvStore};
//!
//! let store = FileStore::open(".techstore")?;
//! store.set("techstore_cart", "[]")?;
//! let saved = store.get("techstore_cart")?;
//! ```

mod error;
mod kv;
mod typed;

pub use error::{KvError, KvResult};
pub use kv::{FileStore, KvStore, MemoryStore, CORRUPT_FILE_NAME, STORE_FILE_NAME};
pub use typed::Store;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStore, KvError, KvStore, MemoryStore, Store};
}
