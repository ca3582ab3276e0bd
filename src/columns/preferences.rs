//! Session-scoped "last used" grid preferences

use std::sync::Arc;

use crate::services::{PersistenceService, StoreResult};

const SHOW_IDENTIFIERS_KEY: &str = "gridbulk.prefs.show_identifiers";

/// Last-used preferences stored next to the column layouts
pub struct Preferences {
    store: Arc<dyn PersistenceService>,
}

impl Preferences {
    #[must_use]
    pub fn new(store: Arc<dyn PersistenceService>) -> Self {
        Self { store }
    }

    /// Whether identifier columns start visible; `false` when unset or malformed
    #[must_use]
    pub fn show_identifiers(&self) -> bool {
        self.store
            .get(SHOW_IDENTIFIERS_KEY)
            .and_then(|raw| raw.trim().parse::<bool>().ok())
            .unwrap_or(false)
    }

    /// Remember the identifier-display toggle
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store rejects the write.
    pub fn set_show_identifiers(&self, show: bool) -> StoreResult<()> {
        self.store.set(SHOW_IDENTIFIERS_KEY, if show { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryStore;

    #[test]
    fn test_default_is_hidden() {
        let prefs = Preferences::new(Arc::new(MemoryStore::new()));
        assert!(!prefs.show_identifiers());
    }

    #[test]
    fn test_toggle_persists() {
        let store = Arc::new(MemoryStore::new());
        Preferences::new(store.clone()).set_show_identifiers(true).unwrap();
        assert!(Preferences::new(store).show_identifiers());
    }

    #[test]
    fn test_malformed_value_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(SHOW_IDENTIFIERS_KEY, "sometimes").unwrap();
        assert!(!Preferences::new(store).show_identifiers());
    }
}
