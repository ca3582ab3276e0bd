//! Session cache of raw reference records
//!
//! Keyed by `EntityTag`. Owned by the orchestrator and lent to the
//! resolver, so every field referencing the same entity in one session
//! reads the same `Arc` and the entity is fetched at most once.

use moka::sync::Cache;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::types::{record_id, record_name};
use crate::schema::EntityTag;
use crate::services::{ReferenceDataService, ServiceError};

/// Upper bound on cached entities; well above the number of tags
const MAX_ENTITIES: u64 = 64;

/// Shared, read-only record list for one entity
pub type RecordList = Arc<[Value]>;

/// Explicit reference-data cache with `get`/`put`/`clear`
#[derive(Clone)]
pub struct ReferenceCache {
    entries: Cache<EntityTag, RecordList>,
}

impl ReferenceCache {
    /// Create a cache that keeps entries for the whole session
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(MAX_ENTITIES)
                .build(),
        }
    }

    #[must_use]
    pub fn get(&self, entity: EntityTag) -> Option<RecordList> {
        self.entries.get(&entity)
    }

    /// Store `records` for `entity`, replacing any previous list
    pub fn put(&self, entity: EntityTag, records: Vec<Value>) -> RecordList {
        let list: RecordList = records.into();
        self.entries.insert(entity, Arc::clone(&list));
        list
    }

    #[must_use]
    pub fn contains(&self, entity: EntityTag) -> bool {
        self.entries.contains_key(&entity)
    }

    pub fn invalidate(&self, entity: EntityTag) {
        self.entries.invalidate(&entity);
    }

    /// Drop every cached entity
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Cached records for `entity`, fetching and storing them on a miss
    ///
    /// # Errors
    ///
    /// Returns the service error when the entity is not cached and the
    /// fetch is rejected. Nothing is cached in that case.
    pub async fn get_or_fetch(
        &self,
        service: &dyn ReferenceDataService,
        entity: EntityTag,
        limit: u32,
    ) -> Result<RecordList, ServiceError> {
        if let Some(hit) = self.get(entity) {
            return Ok(hit);
        }
        let records = fetch_records(service, entity, limit).await?;
        tracing::debug!(entity = %entity, count = records.len(), "reference data loaded");
        Ok(self.put(entity, records))
    }

    /// Best-effort warm-up of commonly needed entities
    ///
    /// Failures are logged and skipped. Already cached entities are not
    /// fetched again.
    pub async fn preload(&self, service: &dyn ReferenceDataService, entities: &[EntityTag], limit: u32) {
        for &entity in entities {
            if let Err(e) = self.get_or_fetch(service, entity, limit).await {
                tracing::warn!(entity = %entity, error = %e, "reference preload failed");
            }
        }
    }

    /// League id → league name, if league data is loaded
    #[must_use]
    pub fn league_names(&self) -> Option<HashMap<String, String>> {
        let leagues = self.get(EntityTag::League)?;
        Some(
            leagues
                .iter()
                .filter_map(|r| Some((record_id(r)?, record_name(r)?.to_string())))
                .collect(),
        )
    }
}

impl Default for ReferenceCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch one entity's records through the appropriate lookup path
///
/// # Errors
///
/// Returns the service error unchanged.
pub async fn fetch_records(
    service: &dyn ReferenceDataService,
    entity: EntityTag,
    limit: u32,
) -> Result<Vec<Value>, ServiceError> {
    match entity {
        EntityTag::DivisionConference => service.list_divisions_conferences().await,
        other => Ok(service.list(other, 1, limit).await?.items),
    }
}
