//! Column presentation of result grids
//!
//! Layouts are scoped to a *shape*: the set of column names of a result.
//! Switching between structurally different results never touches another
//! shape's saved layout, and small column changes are reconciled on load.
//!
//! # Examples
//!
//! ```
//! use gridbulk::columns::{ColumnStateManager, SortState};
//! use gridbulk::services::MemoryStore;
//! use std::sync::Arc;
//!
//! let columns: Vec<String> = ["id", "name", "league_id"].map(String::from).to_vec();
//! let mut grid = ColumnStateManager::new(Arc::new(MemoryStore::new()));
//! grid.initialize_for(&columns);
//! assert_eq!(grid.visible_columns(), vec!["name"]);
//!
//! grid.sort("name");
//! assert_eq!(grid.state().sort, Some(SortState::asc("name")));
//! ```

pub mod manager;
pub mod preferences;
pub mod shape;
pub mod state;
pub mod template;

pub use manager::{ColumnStateManager, KEY_PREFIX};
pub use preferences::Preferences;
pub use shape::shape_id;
pub use state::{ColumnState, SortDirection, SortState, default_visible};
pub use template::ColumnTemplate;
