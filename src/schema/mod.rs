//! Field schema inference for the bulk edit form
//!
//! This module turns either a catalogued entity type or one sample row into
//! the list of editable `FieldDefinition`s, and groups them into form
//! sections:
//! - **Catalog**: static per-entity field lists keyed by `EntityTag`
//! - **Inference**: value-based classification of ad-hoc result rows
//! - **Categories**: Basic Information, Relationships, Dates & Numbers, Other
//!
//! Team-like field sets always carry a required `division_conference_id`.
//!
//! # Examples
//!
//! ```
//! use gridbulk::schema::{EntityTag, FieldCategory, FieldSource, categorize, infer_fields};
//!
//! let fields = infer_fields(&FieldSource::Entity(EntityTag::Team))?;
//! assert!(fields.iter().any(|f| f.name == "division_conference_id" && f.required));
//!
//! let groups = categorize(&fields);
//! assert!(groups.contains_key(&FieldCategory::Relationships));
//! # Ok::<(), gridbulk::schema::SchemaError>(())
//! ```

pub mod catalog;
pub mod categorize;
pub mod error;
pub mod infer;
pub mod types;

pub use catalog::{EntityTag, common_fields, is_server_managed};
pub use categorize::{categorize, classify};
pub use error::{Result, SchemaError};
pub use infer::{DIVISION_CONFERENCE_FIELD, FieldSource, classify_value, infer_fields, is_team_like};
pub use types::{
    FieldCategory, FieldDefinition, FieldKind, humanize, is_identifier_name, is_reference_name,
};
