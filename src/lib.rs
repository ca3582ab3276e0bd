//! Gridbulk - bulk editing engine for tabular sports data
//!
//! This library infers an edit form from an entity type or a sample row,
//! resolves reference fields into labelled options, applies one patch to
//! many records in fail-soft batches, and remembers per-shape column
//! layouts for result grids.

use thiserror::Error;

pub mod batch;
pub mod cancel;
pub mod columns;
pub mod config;
pub mod relations;
pub mod schema;
pub mod services;
pub mod workflow;

#[cfg(test)]
pub mod testing;

pub use batch::{BatchExecutor, EditError, EditTargetSet, RunReport, SelectedFieldPatch, UpdateOutcome};
pub use cancel::CancellationToken;
pub use columns::{ColumnState, ColumnStateManager};
pub use config::EngineConfig;
pub use schema::{EntityTag, FieldDefinition, FieldKind};
pub use workflow::{BulkEditWorkflow, WorkflowState};

/// Error enum, contains all failure states of the library
#[derive(Debug, Error)]
pub enum GridError {
    /// Bulk edit error
    #[error("Edit error: {0}")]
    EditError(#[from] batch::EditError),
    /// Collaborator service error
    #[error("Service error: {0}")]
    ServiceError(#[from] services::ServiceError),
    /// Persistent store error
    #[error("Store error: {0}")]
    StoreError(#[from] services::StoreError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: GridError = EditError::NoFieldsSelected.into();
        assert_eq!(err.to_string(), "Edit error: Select at least one field to update");

        let err: GridError = ::config::ConfigError::Message("bad".into()).into();
        assert!(matches!(err, GridError::ConfigError(_)));
    }
}
