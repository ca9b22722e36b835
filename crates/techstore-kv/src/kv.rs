//! Key-value store trait and backends.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::{KvError, KvResult};

/// File name used by [`FileStore`] inside its data directory.
pub const STORE_FILE_NAME: &str = "store.json";

/// Where [`FileStore`] keeps the last unparsable store file it replaced.
pub const CORRUPT_FILE_NAME: &str = "store.json.corrupt";

/// A durable string-to-string store scoped to one client.
///
/// Every `set` fully replaces the value under `key`. Implementations must
/// make a single `set` atomic: a reader never observes a half-written value.
pub trait KvStore {
    /// Get the value stored under `key`, if any.
    fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> KvResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> KvResult<()>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> KvResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// List all keys.
    fn keys(&self) -> KvResult<Vec<String>>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> KvResult<()> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> KvResult<bool> {
        (**self).exists(key)
    }

    fn keys(&self) -> KvResult<Vec<String>> {
        (**self).keys()
    }
}

/// In-memory store. Lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.write() {
            entries.insert(key.into(), value.into());
        }
        store
    }
}

fn poisoned<T>(_: T) -> KvError {
    KvError::Unavailable("memory store lock poisoned".to_string())
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> KvResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> KvResult<Vec<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Store backed by a single JSON file in a data directory.
///
/// The file holds a JSON object mapping keys to string values. Writes go to
/// a temporary sibling which is then renamed over the store file.
///
/// Reads of an unparsable file fail with [`KvError::Corrupt`]. Writes move
/// such a file aside to [`CORRUPT_FILE_NAME`] and start from an empty store,
/// so one bad file never blocks later saves.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store in `data_dir`, creating the directory if needed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let store = FileStore::open(".techstore")?;
    /// store.set("techstore_cart", "[]")?;
    /// ```
    pub fn open(data_dir: impl AsRef<Path>) -> KvResult<Self> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| KvError::Open {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: dir.join(STORE_FILE_NAME),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> KvResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Entries to rewrite. An unparsable file is set aside and treated as empty.
    fn read_for_write(&self) -> KvResult<BTreeMap<String, String>> {
        match self.read_all() {
            Err(KvError::Corrupt(_)) => {
                fs::rename(&self.path, self.path.with_file_name(CORRUPT_FILE_NAME))?;
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> KvResult<()> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        let mut entries = self.read_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn delete(&self, key: &str) -> KvResult<()> {
        let mut entries = self.read_for_write()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> KvResult<Vec<String>> {
        Ok(self.read_all()?.into_keys().collect())
    }
}
