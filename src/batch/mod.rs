//! Batched bulk updates
//!
//! This module applies one sparse patch across many targets:
//! - `core`: outcome tally, progress payload and run report
//! - `patch`: `SelectedFieldPatch` built from the edit form
//! - `target`: identifier- or index-addressed target sets
//! - `executor`: the fail-soft batch loop and its two commit strategies
//! - `error`: the edit error taxonomy

mod core;
pub mod error;
mod executor;
mod patch;
mod target;

pub use self::core::{ProgressUpdate, RunReport, RunStatus, UpdateOutcome};
pub use error::{EditError, Result};
pub use executor::{BatchExecutor, DEFAULT_BATCH_SIZE};
pub use patch::SelectedFieldPatch;
pub use target::EditTargetSet;
