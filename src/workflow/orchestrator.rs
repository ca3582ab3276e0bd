//! The bulk edit session
//!
//! One `BulkEditWorkflow` drives one form at a time. Every `open` starts a
//! fresh session with its own cancellation token; async results that land
//! after the session closed are dropped.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::state::WorkflowState;
use crate::batch::{
    BatchExecutor, EditError, EditTargetSet, ProgressUpdate, Result, RunReport, SelectedFieldPatch,
    UpdateOutcome,
};
use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::relations::{ReferenceCache, RelationshipOption, RelationshipOptions, RelationshipResolver};
use crate::schema::{FieldCategory, FieldDefinition, categorize, infer_fields};
use crate::services::{ReferenceDataService, RemoteUpdateService};

/// Bulk edit state machine
///
/// `Idle → LoadingSchema → Ready → Processing → ResultsShown → Idle`
pub struct BulkEditWorkflow {
    reference: Arc<dyn ReferenceDataService>,
    executor: BatchExecutor,
    cache: ReferenceCache,
    config: EngineConfig,
    token: CancellationToken,
    state: WorkflowState,
    targets: Option<EditTargetSet>,
    fields: Vec<FieldDefinition>,
    categories: BTreeMap<FieldCategory, Vec<FieldDefinition>>,
    options: RelationshipOptions,
    selection: BTreeMap<String, bool>,
    values: BTreeMap<String, Value>,
    notice: Option<String>,
}

impl BulkEditWorkflow {
    #[must_use]
    pub fn new(
        reference: Arc<dyn ReferenceDataService>,
        remote: Arc<dyn RemoteUpdateService>,
        config: EngineConfig,
    ) -> Self {
        let executor = BatchExecutor::new(remote)
            .with_batch_size(config.batch_size)
            .with_yield_between_batches(config.yield_between_batches);
        Self {
            reference,
            executor,
            cache: ReferenceCache::new(),
            config,
            token: CancellationToken::new(),
            state: WorkflowState::Idle,
            targets: None,
            fields: Vec::new(),
            categories: BTreeMap::new(),
            options: RelationshipOptions::new(),
            selection: BTreeMap::new(),
            values: BTreeMap::new(),
            notice: None,
        }
    }

    /// Share a reference cache with other sessions
    #[must_use]
    pub fn with_cache(mut self, cache: ReferenceCache) -> Self {
        self.cache = cache;
        self
    }

    /// Open the form for `targets` and load its relationship options
    pub async fn open(&mut self, targets: EditTargetSet) {
        self.begin(targets);
        self.load_options().await;
    }

    /// Start a fresh session and infer its fields
    ///
    /// Ends in `Ready` with empty options. An inference failure leaves a
    /// notice and an empty form.
    pub fn begin(&mut self, targets: EditTargetSet) {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.reset_form();
        self.state = WorkflowState::LoadingSchema;

        let inferred = targets
            .field_source()
            .and_then(|source| infer_fields(&source))
            .map_err(EditError::from);
        match inferred {
            Ok(fields) => self.fields = fields,
            Err(e) => {
                tracing::warn!(error = %e, "bulk edit form opened without fields");
                self.notice = Some(e.to_string());
            }
        }
        self.categories = categorize(&self.fields);
        self.selection = self.fields.iter().map(|f| (f.name.clone(), false)).collect();
        self.targets = Some(targets);
        self.state = WorkflowState::Ready;
        tracing::debug!(fields = self.fields.len(), "bulk edit form ready");
    }

    /// Fill relationship options for the current form, field by field
    pub async fn load_options(&mut self) {
        self.load_options_with(|_, _| {}).await;
    }

    /// Like `load_options`, calling `on_field` as each field's list lands
    ///
    /// Nothing is delivered once the session is closed.
    pub async fn load_options_with<F>(&mut self, mut on_field: F)
    where
        F: FnMut(&str, &[RelationshipOption]),
    {
        let token = self.token.clone();
        let page_size = self.config.reference_page_size;
        self.cache
            .preload(self.reference.as_ref(), &self.config.preload, page_size)
            .await;

        let resolver =
            RelationshipResolver::new(self.reference.as_ref(), &self.cache).with_page_size(page_size);
        let options = &mut self.options;
        resolver
            .resolve_into(&self.fields, &token, |field, list| {
                on_field(field, &list[..]);
                options.insert(field, list);
            })
            .await;
        if token.is_cancelled() {
            tracing::debug!(error = %EditError::StaleContextWrite, "option loading stopped");
        }
    }

    /// Drop cached reference data for this form and load it again
    pub async fn refresh_options(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        let resolver = RelationshipResolver::new(self.reference.as_ref(), &self.cache)
            .with_page_size(self.config.reference_page_size);
        let fresh = resolver.refresh(&self.fields).await;
        if self.token.is_cancelled() {
            tracing::debug!(error = %EditError::StaleContextWrite, "refreshed options dropped");
            return;
        }
        for (field, list) in fresh.iter() {
            self.options.insert(field, list.clone());
        }
    }

    /// Check or uncheck a field; returns false for unknown fields
    pub fn select_field(&mut self, field: &str, selected: bool) -> bool {
        match self.selection.get_mut(field) {
            Some(entry) => {
                *entry = selected;
                true
            }
            None => false,
        }
    }

    /// Record the entered value for a field
    pub fn set_value(&mut self, field: &str, value: Value) -> bool {
        if !self.selection.contains_key(field) {
            return false;
        }
        self.values.insert(field.to_string(), value);
        true
    }

    /// Check or uncheck every field in `category`
    pub fn select_all_in_category(&mut self, category: FieldCategory, selected: bool) {
        let Some(fields) = self.categories.get(&category) else {
            return;
        };
        for field in fields {
            self.selection.insert(field.name.clone(), selected);
        }
    }

    /// Apply the checked fields to every target
    ///
    /// A clean run waits the configured delay, hands the report to
    /// `on_complete` and closes the form. A partial run stays in
    /// `ResultsShown` until `dismiss`.
    ///
    /// # Errors
    ///
    /// Returns `NoFieldsSelected` or `InvalidValue` without changing state,
    /// or `StaleContextWrite` when no form is ready. A session closed
    /// through its cancel handle is reset to `Idle` and nothing is sent.
    pub async fn confirm<P, C>(&mut self, mut on_progress: P, on_complete: C) -> Result<RunReport>
    where
        P: FnMut(ProgressUpdate),
        C: FnOnce(&RunReport),
    {
        if self.token.is_cancelled() {
            tracing::debug!(error = %EditError::StaleContextWrite, "confirm on closed session");
            self.reset();
            return Err(EditError::StaleContextWrite);
        }
        if !self.state.is_ready() {
            return Err(EditError::StaleContextWrite);
        }
        let Some(targets) = self.targets.as_ref() else {
            return Err(EditError::StaleContextWrite);
        };
        let patch = SelectedFieldPatch::from_selection(&self.fields, &self.selection, &self.values)?;
        let token = self.token.clone();

        self.state = WorkflowState::Processing(ProgressUpdate::new(0, targets.len(), UpdateOutcome::new()));
        let state = &mut self.state;
        let run = self
            .executor
            .run(targets, &patch, &token, |progress| {
                *state = WorkflowState::Processing(progress);
                on_progress(progress);
            })
            .await;
        let report = match run {
            Ok(report) => report,
            Err(e) => {
                self.state = WorkflowState::Ready;
                return Err(e);
            }
        };
        tracing::debug!(summary = %report.summary(), "bulk edit finished");

        if token.is_cancelled() {
            tracing::debug!(error = %EditError::StaleContextWrite, "results dropped for closed session");
            self.reset();
            return Ok(report);
        }
        self.state = WorkflowState::ResultsShown(report.clone());
        if !report.is_success() {
            return Ok(report);
        }

        tokio::time::sleep(self.config.completion_delay()).await;
        if token.is_cancelled() {
            tracing::debug!(error = %EditError::StaleContextWrite, "completion skipped for closed session");
        } else {
            on_complete(&report);
        }
        self.reset();
        Ok(report)
    }

    /// Leave the results view
    pub fn dismiss(&mut self) {
        if self.state.report().is_some() {
            self.close();
        }
    }

    /// Cancel outstanding work and reset to `Idle`
    pub fn close(&mut self) {
        self.token.cancel();
        self.reset();
    }

    /// Handle that closes the current session from elsewhere
    #[must_use]
    pub fn cancel_handle(&self) -> CancellationToken {
        self.token.clone()
    }

    #[must_use]
    pub const fn state(&self) -> &WorkflowState {
        &self.state
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    #[must_use]
    pub const fn categories(&self) -> &BTreeMap<FieldCategory, Vec<FieldDefinition>> {
        &self.categories
    }

    #[must_use]
    pub const fn options(&self) -> &RelationshipOptions {
        &self.options
    }

    #[must_use]
    pub fn options_for(&self, field: &str) -> &[RelationshipOption] {
        self.options.options_for(field)
    }

    #[must_use]
    pub fn is_selected(&self, field: &str) -> bool {
        self.selection.get(field).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Message explaining an empty form
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub const fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    fn reset_form(&mut self) {
        self.fields.clear();
        self.categories.clear();
        self.options.clear();
        self.selection.clear();
        self.values.clear();
        self.notice = None;
    }

    fn reset(&mut self) {
        self.reset_form();
        self.targets = None;
        self.state = WorkflowState::Idle;
    }
}
