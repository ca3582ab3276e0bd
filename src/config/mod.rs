//! Engine configuration
//!
//! Tunables for batching, reference loading and the success delay.
//! Configuration is stored in the user's config directory as TOML.

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::relations::DEFAULT_PAGE_SIZE;
use crate::schema::EntityTag;
use crate::services::{MemoryStore, PersistenceService, SledStore, StoreResult};

/// Engine configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Targets processed per batch before yielding
    pub batch_size: usize,

    /// Records requested per reference listing
    pub reference_page_size: u32,

    /// Pause before closing the form after a clean run
    pub completion_delay_ms: u64,

    /// Yield to the runtime between batches
    pub yield_between_batches: bool,

    /// Entities loaded into the reference cache when a form opens
    pub preload: Vec<EntityTag>,

    /// Directory of the sled store for column layouts; in-memory when unset
    pub state_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            reference_page_size: DEFAULT_PAGE_SIZE,
            completion_delay_ms: 1500,
            yield_between_batches: true,
            preload: vec![EntityTag::League, EntityTag::DivisionConference],
            state_path: None,
        }
    }
}

impl EngineConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("gridbulk").join("config.toml"))
    }

    /// Load configuration from the user's config file, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;
        settings.try_deserialize()
    }

    /// Parse inline TOML; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not valid TOML for this structure.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Save configuration to the user's config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the
    /// configuration cannot be serialized, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the
    /// configuration cannot be serialized, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    #[must_use]
    pub const fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    /// Open the column state store this configuration points at
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the sled directory cannot be opened.
    pub fn open_store(&self) -> StoreResult<Arc<dyn PersistenceService>> {
        match &self.state_path {
            Some(path) => Ok(Arc::new(SledStore::open(path)?)),
            None => Ok(Arc::new(MemoryStore::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.reference_page_size, 100);
        assert_eq!(config.completion_delay(), Duration::from_millis(1500));
        assert!(config.yield_between_batches);
        assert_eq!(config.preload, vec![EntityTag::League, EntityTag::DivisionConference]);
        assert!(config.state_path.is_none());
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = EngineConfig::from_toml_str("batch_size = 25\npreload = [\"team\"]\n").unwrap();
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.preload, vec![EntityTag::Team]);
        assert_eq!(config.completion_delay_ms, 1500);
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_entity() {
        assert!(EngineConfig::from_toml_str("preload = [\"umpire\"]").is_err());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = EngineConfig::load_from(&path).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = EngineConfig {
            completion_delay_ms: 0,
            state_path: Some(dir.path().join("state")),
            ..EngineConfig::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(EngineConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_open_store_backends() {
        let dir = TempDir::new().unwrap();
        let memory = EngineConfig::default().open_store().unwrap();
        memory.set("k", "v").unwrap();
        assert_eq!(memory.get("k").as_deref(), Some("v"));

        let config = EngineConfig {
            state_path: Some(dir.path().join("state")),
            ..EngineConfig::default()
        };
        let durable = config.open_store().unwrap();
        durable.set("k", "v").unwrap();
        assert_eq!(durable.get("k").as_deref(), Some("v"));
    }
}
