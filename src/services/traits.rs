//! Collaborator interfaces the edit engine depends on
//!
//! The surrounding shell owns transport, auth and storage. The engine only
//! sees these three seams, so tests can swap in the mocks from
//! [`super::mock`].

use async_trait::async_trait;
use serde_json::Value;

use super::error::{ServiceError, StoreResult};
use crate::batch::SelectedFieldPatch;
use crate::schema::EntityTag;

/// One page of reference records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPage {
    pub items: Vec<Value>,
}

impl ListPage {
    #[must_use]
    pub const fn new(items: Vec<Value>) -> Self {
        Self { items }
    }
}

/// Source of candidate records for reference fields
///
/// Failures must come back as `Err`, never as a panic.
#[async_trait]
pub trait ReferenceDataService: Send + Sync {
    /// List records of one entity type (1-based `page`)
    async fn list(&self, entity: EntityTag, page: u32, limit: u32) -> Result<ListPage, ServiceError>;

    /// Dedicated lookup for division/conference records
    async fn list_divisions_conferences(&self) -> Result<Vec<Value>, ServiceError>;
}

/// Remote write path used by the identifier-based batch strategy
#[async_trait]
pub trait RemoteUpdateService: Send + Sync {
    /// Apply `patch` to the entity `id`
    async fn update_entity(
        &self,
        entity: EntityTag,
        id: &str,
        patch: &SelectedFieldPatch,
    ) -> Result<(), ServiceError>;
}

/// Key-value persistence for column layouts and session preferences
///
/// Reads never fail: an unreadable value is reported as absent.
pub trait PersistenceService: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing store rejects the write.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}
