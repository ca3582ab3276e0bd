//! Relationship resolution for reference fields
//!
//! - `cache`: per-session store of raw reference records (`ReferenceCache`)
//! - `resolver`: builds `{id, label}` options per field from that cache
//! - `types`: `RelationshipOption` and the per-field option map
//!
//! A reference field is any `*_id` field other than bare `id`; the entity
//! it points at is its name without the suffix.

pub mod cache;
pub mod resolver;
pub mod types;

pub use cache::{RecordList, ReferenceCache, fetch_records};
pub use resolver::{DEFAULT_PAGE_SIZE, RelationshipResolver, UNKNOWN_LEAGUE};
pub use types::{OptionList, RelationshipOption, RelationshipOptions, id_string, record_id, record_name};
