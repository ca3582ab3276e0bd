//! Scriptable in-memory services for testing and demos
//!
//! Both mocks record every call so tests can assert on request counts
//! and ordering without a network.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::error::ServiceError;
use super::traits::{ListPage, ReferenceDataService, RemoteUpdateService};
use crate::batch::SelectedFieldPatch;
use crate::schema::EntityTag;

/// Reference data service returning predetermined records
#[derive(Debug, Default)]
pub struct MockReferenceService {
    records: HashMap<EntityTag, Vec<Value>>,
    failing: HashSet<EntityTag>,
    calls: Mutex<Vec<EntityTag>>,
}

impl MockReferenceService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` for `entity`
    ///
    /// `DivisionConference` records are served through the dedicated lookup.
    #[must_use]
    pub fn with_records(mut self, entity: EntityTag, records: Vec<Value>) -> Self {
        self.records.insert(entity, records);
        self
    }

    /// Reject every request for `entity`
    #[must_use]
    pub fn failing(mut self, entity: EntityTag) -> Self {
        self.failing.insert(entity);
        self
    }

    /// Every entity requested so far, in call order
    #[must_use]
    pub fn calls(&self) -> Vec<EntityTag> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of requests made for `entity`
    #[must_use]
    pub fn call_count(&self, entity: EntityTag) -> usize {
        self.calls().iter().filter(|e| **e == entity).count()
    }

    fn serve(&self, entity: EntityTag) -> Result<Vec<Value>, ServiceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(entity);
        }
        if self.failing.contains(&entity) {
            return Err(ServiceError::Unavailable(format!("{entity} lookup failed")));
        }
        Ok(self.records.get(&entity).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ReferenceDataService for MockReferenceService {
    async fn list(&self, entity: EntityTag, page: u32, limit: u32) -> Result<ListPage, ServiceError> {
        let items = self.serve(entity)?;
        let skip = (page.saturating_sub(1) as usize) * limit as usize;
        Ok(ListPage::new(
            items.into_iter().skip(skip).take(limit as usize).collect(),
        ))
    }

    async fn list_divisions_conferences(&self) -> Result<Vec<Value>, ServiceError> {
        self.serve(EntityTag::DivisionConference)
    }
}

/// A recorded update call
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCall {
    pub entity: EntityTag,
    pub id: String,
    pub patch: SelectedFieldPatch,
}

/// Update service that accepts everything except a scripted set of ids
#[derive(Debug, Default)]
pub struct MockUpdateService {
    rejected_ids: HashSet<String>,
    calls: Mutex<Vec<UpdateCall>>,
}

impl MockUpdateService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject updates addressed to `id`
    #[must_use]
    pub fn rejecting(mut self, id: impl Into<String>) -> Self {
        self.rejected_ids.insert(id.into());
        self
    }

    /// Every update attempted so far, in call order
    #[must_use]
    pub fn calls(&self) -> Vec<UpdateCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Ids attempted so far, in call order
    #[must_use]
    pub fn attempted_ids(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.id).collect()
    }
}

#[async_trait]
impl RemoteUpdateService for MockUpdateService {
    async fn update_entity(
        &self,
        entity: EntityTag,
        id: &str,
        patch: &SelectedFieldPatch,
    ) -> Result<(), ServiceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(UpdateCall {
                entity,
                id: id.to_string(),
                patch: patch.clone(),
            });
        }
        if self.rejected_ids.contains(id) {
            return Err(ServiceError::Rejected(format!("{entity} {id} refused the update")));
        }
        Ok(())
    }
}
