//! Turns reference fields into dropdown options
//!
//! Generic references list their entity through the reference service and
//! label each record with its `name`. Division/conference candidates come
//! from the dedicated lookup and are labelled `"<division> (<league>)"`,
//! sorted by league then division.

use std::collections::HashSet;
use std::sync::Arc;

use super::cache::{RecordList, ReferenceCache};
use super::types::{
    OptionList, RelationshipOption, RelationshipOptions, id_string, record_id, record_name,
};
use crate::batch::EditError;
use crate::cancel::CancellationToken;
use crate::schema::{EntityTag, FieldDefinition};
use crate::services::ReferenceDataService;

/// Placeholder when a division's league is not loaded
pub const UNKNOWN_LEAGUE: &str = "Unknown League";

/// Default number of candidates fetched per entity
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Resolves reference fields against a shared `ReferenceCache`
pub struct RelationshipResolver<'a> {
    service: &'a dyn ReferenceDataService,
    cache: &'a ReferenceCache,
    page_size: u32,
}

impl<'a> RelationshipResolver<'a> {
    #[must_use]
    pub fn new(service: &'a dyn ReferenceDataService, cache: &'a ReferenceCache) -> Self {
        Self {
            service,
            cache,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Resolve options for every reference field in `fields`
    ///
    /// Fields whose entity is unknown or whose fetch fails are left out of
    /// the result.
    pub async fn resolve(&self, fields: &[FieldDefinition]) -> RelationshipOptions {
        let mut resolved = RelationshipOptions::new();
        self.resolve_into(fields, &CancellationToken::new(), |field, options| {
            resolved.insert(field, options);
        })
        .await;
        resolved
    }

    /// Resolve field by field, handing each finished list to `on_field`
    ///
    /// Stops delivering once `token` is cancelled. Fetches already issued
    /// complete, but their results are dropped.
    pub async fn resolve_into<F>(&self, fields: &[FieldDefinition], token: &CancellationToken, mut on_field: F)
    where
        F: FnMut(&str, OptionList),
    {
        let mut failed: HashSet<EntityTag> = HashSet::new();
        for (field, entity) in plan(fields) {
            if token.is_cancelled() {
                return;
            }
            if failed.contains(&entity) {
                continue;
            }
            let records = match self.cache.get_or_fetch(self.service, entity, self.page_size).await {
                Ok(records) => records,
                Err(source) => {
                    let err = EditError::RelationshipFetch {
                        field: field.name.clone(),
                        source,
                    };
                    tracing::warn!(entity = %entity, error = %err, "relationship options unavailable");
                    failed.insert(entity);
                    continue;
                }
            };
            if token.is_cancelled() {
                tracing::debug!(field = %field.name, "dropping options for closed session");
                return;
            }
            let options = match entity {
                EntityTag::DivisionConference => self.division_options(&records),
                _ => generic_options(&records),
            };
            on_field(&field.name, options);
        }
    }

    /// Drop cached data for the entities `fields` reference, then resolve again
    pub async fn refresh(&self, fields: &[FieldDefinition]) -> RelationshipOptions {
        for (_, entity) in plan(fields) {
            self.cache.invalidate(entity);
        }
        self.resolve(fields).await
    }

    fn division_options(&self, records: &RecordList) -> OptionList {
        let leagues = self.cache.league_names().unwrap_or_default();
        let mut options: Vec<RelationshipOption> = records
            .iter()
            .filter_map(|record| {
                let id = record_id(record)?;
                let name = record_name(record).map_or_else(|| id.clone(), str::to_string);
                let league = record
                    .get("league_id")
                    .and_then(id_string)
                    .and_then(|league_id| leagues.get(&league_id).cloned())
                    .unwrap_or_else(|| UNKNOWN_LEAGUE.to_string());
                Some(RelationshipOption::new(id, format!("{name} ({league})")).with_sort_key(league))
            })
            .collect();
        options.sort_by(|a, b| a.sort_key.cmp(&b.sort_key).then_with(|| a.label.cmp(&b.label)));
        Arc::from(options)
    }
}

/// Reference fields with a known entity, generic lookups first
fn plan(fields: &[FieldDefinition]) -> Vec<(&FieldDefinition, EntityTag)> {
    let mut planned: Vec<_> = fields
        .iter()
        .filter_map(|field| {
            let name = field.referenced_entity()?;
            match name.parse::<EntityTag>() {
                Ok(entity) if entity.is_resolvable() => Some((field, entity)),
                _ => {
                    tracing::debug!(field = %field.name, "no reference lookup for field");
                    None
                }
            }
        })
        .collect();
    // stable: keeps input order inside each group
    planned.sort_by_key(|(_, entity)| *entity == EntityTag::DivisionConference);
    planned
}

fn generic_options(records: &RecordList) -> OptionList {
    records
        .iter()
        .filter_map(|record| {
            let id = record_id(record)?;
            let label = record_name(record).map_or_else(|| id.clone(), str::to_string);
            Some(RelationshipOption::new(id, label))
        })
        .collect()
}
