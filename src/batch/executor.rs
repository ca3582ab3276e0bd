//! Fail-soft batch executor
//!
//! Targets are split into fixed-size batches and processed one at a time,
//! strictly in order. A failing item is logged and tallied; it never stops
//! the run. Progress is reported after every item.

use serde_json::Value;
use std::sync::Arc;

use super::core::{ProgressUpdate, RunReport, UpdateOutcome};
use super::error::{EditError, Result};
use super::patch::SelectedFieldPatch;
use super::target::EditTargetSet;
use crate::cancel::CancellationToken;
use crate::schema::EntityTag;
use crate::services::RemoteUpdateService;

/// Default number of targets per batch
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Applies one patch to one target at a time
trait Committer {
    fn len(&self) -> usize;

    /// Identifier used in logs
    fn describe(&self, position: usize) -> String;

    async fn commit(&mut self, position: usize, patch: &SelectedFieldPatch) -> Result<()>;

    /// Patched rows, for strategies that keep them
    fn into_rows(self) -> Option<Vec<Value>>;
}

struct RemoteCommitter<'a> {
    service: &'a dyn RemoteUpdateService,
    entity: EntityTag,
    ids: &'a [String],
}

impl Committer for RemoteCommitter<'_> {
    fn len(&self) -> usize {
        self.ids.len()
    }

    fn describe(&self, position: usize) -> String {
        format!("{} {}", self.entity, self.ids[position])
    }

    async fn commit(&mut self, position: usize, patch: &SelectedFieldPatch) -> Result<()> {
        let id = &self.ids[position];
        self.service
            .update_entity(self.entity, id, patch)
            .await
            .map_err(|source| EditError::ItemUpdate {
                id: id.clone(),
                source,
            })
    }

    fn into_rows(self) -> Option<Vec<Value>> {
        None
    }
}

struct LocalCommitter {
    indices: Vec<usize>,
    rows: Vec<Value>,
}

impl Committer for LocalCommitter {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn describe(&self, position: usize) -> String {
        format!("row {}", self.indices[position])
    }

    async fn commit(&mut self, position: usize, patch: &SelectedFieldPatch) -> Result<()> {
        let index = self.indices[position];
        let row = self.rows.get_mut(index).ok_or_else(|| EditError::ItemMutation {
            index,
            reason: "index out of range".to_string(),
        })?;
        patch
            .apply_to(row)
            .map_err(|reason| EditError::ItemMutation { index, reason })
    }

    fn into_rows(self) -> Option<Vec<Value>> {
        Some(self.rows)
    }
}

/// Runs a patch across a target set
pub struct BatchExecutor {
    remote: Arc<dyn RemoteUpdateService>,
    batch_size: usize,
    yield_between_batches: bool,
}

impl BatchExecutor {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteUpdateService>) -> Self {
        Self {
            remote,
            batch_size: DEFAULT_BATCH_SIZE,
            yield_between_batches: true,
        }
    }

    /// Set the batch size (values below 1 are treated as 1)
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Yield to the runtime between batches so the shell can repaint
    #[must_use]
    pub const fn with_yield_between_batches(mut self, enabled: bool) -> Self {
        self.yield_between_batches = enabled;
        self
    }

    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Apply `patch` to every target
    ///
    /// `on_progress` runs after each item with a strictly increasing
    /// `processed` count; its last call carries the returned tally. Once
    /// `token` is cancelled progress calls stop, but the remaining items
    /// are still processed and tallied.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NoFieldsSelected` for an empty patch. Item
    /// failures are never returned; they are counted in the report.
    pub async fn run<F>(
        &self,
        targets: &EditTargetSet,
        patch: &SelectedFieldPatch,
        token: &CancellationToken,
        on_progress: F,
    ) -> Result<RunReport>
    where
        F: FnMut(ProgressUpdate),
    {
        if patch.is_empty() {
            return Err(EditError::NoFieldsSelected);
        }
        match targets {
            EditTargetSet::ByIdentifier { entity, ids } => {
                let committer = RemoteCommitter {
                    service: self.remote.as_ref(),
                    entity: *entity,
                    ids,
                };
                Ok(self.drive(committer, patch, token, on_progress).await)
            }
            EditTargetSet::ByIndex { indices, rows } => {
                let committer = LocalCommitter {
                    indices: indices.iter().copied().collect(),
                    rows: rows.clone(),
                };
                Ok(self.drive(committer, patch, token, on_progress).await)
            }
        }
    }

    async fn drive<C, F>(
        &self,
        mut committer: C,
        patch: &SelectedFieldPatch,
        token: &CancellationToken,
        mut on_progress: F,
    ) -> RunReport
    where
        C: Committer,
        F: FnMut(ProgressUpdate),
    {
        let total = committer.len();
        let positions: Vec<usize> = (0..total).collect();
        let mut outcome = UpdateOutcome::new();

        for (batch, chunk) in positions.chunks(self.batch_size).enumerate() {
            if batch > 0 && self.yield_between_batches {
                tokio::task::yield_now().await;
            }
            tracing::debug!(batch, size = chunk.len(), total, "processing batch");
            for &position in chunk {
                match committer.commit(position, patch).await {
                    Ok(()) => outcome.add_success(),
                    Err(e) => {
                        tracing::warn!(target_item = %committer.describe(position), error = %e, "bulk edit item failed");
                        outcome.add_failure();
                    }
                }
                if token.is_cancelled() {
                    continue;
                }
                on_progress(ProgressUpdate::new(outcome.processed(), total, outcome));
            }
        }

        if !outcome.is_clean() {
            tracing::warn!(succeeded = outcome.succeeded, failed = outcome.failed, "bulk edit finished with failures");
        }
        RunReport::new(outcome, committer.into_rows())
    }
}
