//! Persistence store implementations
//!
//! - `SledStore`: durable store on a sled tree, values encoded with bincode
//! - `MemoryStore`: process-local map, used for session scope and tests

use sled::{Db, Tree};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use super::error::{StoreError, StoreResult};
use super::traits::PersistenceService;

/// Name of the sled tree holding grid state
const STATE_TREE: &str = "grid_state";

/// Durable key-value store backed by sled
///
/// Keys are stored as raw UTF-8; values as bincode-encoded strings.
pub struct SledStore {
    db: Db,
    state: Tree,
}

impl SledStore {
    /// Opens or creates a store at the specified directory
    ///
    /// # Examples
    /// ```no_run
    /// use gridbulk::services::SledStore;
    /// let store = SledStore::open("grid_state_db").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database or its tree cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path)?;
        let state = db.open_tree(STATE_TREE)?;
        Ok(Self { db, state })
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Check whether the store holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Remove every stored key
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if sled fails to clear the tree.
    pub fn clear(&self) -> StoreResult<()> {
        self.state.clear()?;
        Ok(())
    }

    /// Flush pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if sled fails to flush.
    pub fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        Ok(())
    }

    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match self.state.get(key.as_bytes())? {
            Some(bytes) => {
                let (value, _): (String, usize) =
                    bincode::decode_from_slice(&bytes, bincode::config::standard())?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

impl PersistenceService for SledStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "unreadable stored value treated as absent");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let encoded = bincode::encode_to_vec(value, bincode::config::standard())?;
        self.state.insert(key.as_bytes(), encoded)?;
        Ok(())
    }
}

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceService for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sled_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::open(dir.path().join("state")).unwrap();

        assert!(store.is_empty());
        store.set("layout", r#"["a","b"]"#).unwrap();
        assert_eq!(store.get("layout").as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sled_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state");
        {
            let store = SledStore::open(&path).unwrap();
            store.set("k", "v").unwrap();
            store.flush().unwrap();
        }
        let store = SledStore::open(&path).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_sled_store_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::open(dir.path().join("state")).unwrap();
        assert_eq!(store.get("nothing"), None);
    }

    #[test]
    fn test_sled_store_garbage_bytes_read_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::open(dir.path().join("state")).unwrap();
        store.state.insert("broken", vec![0xff, 0xff, 0xff]).unwrap();
        assert_eq!(store.get("broken"), None);
    }

    #[test]
    fn test_memory_store_overwrite() {
        let store = MemoryStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }
}
