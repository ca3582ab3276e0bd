//! Edit error taxonomy
//!
//! Only `NoFieldsSelected`, `InvalidValue` and `SchemaInference` reach the
//! user. Per-item and per-field failures are logged and folded into tallies
//! or empty option lists; `StaleContextWrite` is dropped silently.

use thiserror::Error;

use crate::schema::SchemaError;
use crate::services::ServiceError;

/// Errors raised by the bulk edit workflow
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EditError {
    /// Confirm pressed with nothing checked
    #[error("Select at least one field to update")]
    NoFieldsSelected,

    /// Entered value does not fit the field's kind
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// The field list could not be determined
    #[error("Could not determine editable fields: {0}")]
    SchemaInference(#[from] SchemaError),

    /// Options for one reference field could not be loaded
    #[error("Options for '{field}' unavailable: {source}")]
    RelationshipFetch {
        field: String,
        #[source]
        source: ServiceError,
    },

    /// Remote update of one entity was rejected
    #[error("Update of '{id}' failed: {source}")]
    ItemUpdate {
        id: String,
        #[source]
        source: ServiceError,
    },

    /// Local patch of one row failed
    #[error("Row {index} could not be updated: {reason}")]
    ItemMutation { index: usize, reason: String },

    /// A finished async step targeted a closed session
    #[error("Edit session already closed")]
    StaleContextWrite,
}

impl EditError {
    /// Whether the shell should show this error to the user
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NoFieldsSelected | Self::InvalidValue { .. } | Self::SchemaInference(_)
        )
    }
}

/// Type alias for edit operations
pub type Result<T> = std::result::Result<T, EditError>;
