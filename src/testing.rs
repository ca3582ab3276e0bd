//! Testing utilities for gridbulk
//!
//! This module provides reference fixtures, a preloaded mock reference
//! service and a `TestStore` wrapper for temporary sled state.
//!
//! Only available when compiled with `cfg(test)`.

use serde_json::{Value, json};
use std::ops::Deref;
use std::path::Path;
use tempfile::TempDir;

use crate::config::EngineConfig;
use crate::schema::EntityTag;
use crate::services::{MockReferenceService, PersistenceService, SledStore, StoreResult};

/// Wrapper for a temporary sled store that is removed on drop
///
/// Derefs to the underlying `SledStore`.
pub struct TestStore {
    // declared first so the tree closes before the directory goes away
    store: SledStore,
    dir: TempDir,
}

impl TestStore {
    /// Open an empty store in a fresh temporary directory
    ///
    /// # Panics
    /// Panics if the directory or the store cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = SledStore::open(dir.path().join("state")).expect("Failed to open test store");
        Self { store, dir }
    }

    /// Get the path of the backing directory
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Deref for TestStore {
    type Target = SledStore;

    fn deref(&self) -> &SledStore {
        &self.store
    }
}

impl PersistenceService for TestStore {
    fn get(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.store.set(key, value)
    }
}

/// Two leagues: NFL (`l1`) and NBA (`l2`)
#[must_use]
pub fn leagues() -> Vec<Value> {
    vec![
        json!({"id": "l1", "name": "NFL", "sport": "football"}),
        json!({"id": "l2", "name": "NBA", "sport": "basketball"}),
    ]
}

/// Divisions across both leagues, one pointing at an unloaded league
#[must_use]
pub fn divisions() -> Vec<Value> {
    vec![
        json!({"id": "d1", "name": "Pacific", "league_id": "l2"}),
        json!({"id": "d2", "name": "AFC West", "league_id": "l1"}),
        json!({"id": "d3", "name": "Atlantic", "league_id": "l2"}),
        json!({"id": "d4", "name": "Midwest", "league_id": "l9"}),
    ]
}

#[must_use]
pub fn stadiums() -> Vec<Value> {
    vec![
        json!({"id": "s1", "name": "Empower Field"}),
        json!({"id": "s2", "name": "Crypto.com Arena"}),
    ]
}

/// Ad-hoc result rows shaped like teams
#[must_use]
pub fn team_rows() -> Vec<Value> {
    vec![
        json!({"id": "t1", "name": "Broncos", "city": "Denver", "league_id": "l1", "founded_year": 1960}),
        json!({"id": "t2", "name": "Lakers", "city": "Los Angeles", "league_id": "l2", "founded_year": 1947}),
        json!({"id": "t3", "name": "Celtics", "city": "Boston", "league_id": "l2", "founded_year": 1946}),
    ]
}

/// Reference service serving leagues, divisions and stadiums
#[must_use]
pub fn reference_service() -> MockReferenceService {
    MockReferenceService::new()
        .with_records(EntityTag::League, leagues())
        .with_records(EntityTag::DivisionConference, divisions())
        .with_records(EntityTag::Stadium, stadiums())
}

/// Default configuration without the success delay
#[must_use]
pub fn quick_config() -> EngineConfig {
    EngineConfig {
        completion_delay_ms: 0,
        ..EngineConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_basic() {
        let store = TestStore::new();
        store.set("key", "value").unwrap();
        assert_eq!(store.get("key").as_deref(), Some("value"));
        assert!(store.path().exists());
    }

    #[test]
    fn test_store_cleanup() {
        let path = {
            let store = TestStore::new();
            store.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_fixtures_are_objects() {
        assert!(team_rows().iter().all(Value::is_object));
        assert_eq!(divisions().len(), 4);
    }
}
