//! Persisted column layout for one grid
//!
//! The manager owns the `ColumnState` of the shape currently shown. Every
//! mutation goes through `&mut self` and is written to the persistence
//! service right away; write failures are logged and otherwise ignored.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::shape::shape_id;
use super::state::{ColumnState, SortDirection, SortState};
use super::template::ColumnTemplate;
use crate::services::PersistenceService;

/// Key prefix for everything the column manager stores
pub const KEY_PREFIX: &str = "gridbulk.columns";

/// Column state manager bound to one result shape at a time
pub struct ColumnStateManager {
    store: Arc<dyn PersistenceService>,
    shape_id: String,
    columns: Vec<String>,
    state: ColumnState,
    show_identifiers: bool,
}

impl ColumnStateManager {
    /// Create a manager with no shape loaded
    #[must_use]
    pub fn new(store: Arc<dyn PersistenceService>) -> Self {
        Self {
            store,
            shape_id: String::new(),
            columns: Vec::new(),
            state: ColumnState::default(),
            show_identifiers: false,
        }
    }

    /// Show identifier columns by default on shapes seen for the first time
    #[must_use]
    pub const fn with_identifiers_shown(mut self, show: bool) -> Self {
        self.show_identifiers = show;
        self
    }

    /// Load (or create) the layout for `shape_id` and fit it to `columns`
    pub fn initialize(&mut self, shape_id: &str, columns: &[String]) -> &ColumnState {
        self.shape_id = shape_id.to_string();
        self.columns = columns.to_vec();

        let stored_order: Option<Vec<String>> = self.load("order");
        let stored_visibility: Option<BTreeMap<String, bool>> = self.load("visibility");
        let stored_sort: Option<Option<SortState>> = self.load("sort");

        let state = match (stored_order, stored_visibility) {
            (None, None) => {
                tracing::debug!(shape = shape_id, "new grid shape, using default layout");
                ColumnState::with_defaults(columns, self.show_identifiers)
            }
            (order, visibility) => ColumnState {
                visibility: visibility.unwrap_or_default(),
                order: order.unwrap_or_default(),
                sort: stored_sort.flatten(),
            }
            .reconciled(columns, self.show_identifiers),
        };
        self.state = state;
        self.persist();
        &self.state
    }

    /// Initialize using the shape id derived from `columns`
    pub fn initialize_for(&mut self, columns: &[String]) -> &ColumnState {
        let id = shape_id(columns);
        self.initialize(&id, columns)
    }

    #[must_use]
    pub const fn state(&self) -> &ColumnState {
        &self.state
    }

    #[must_use]
    pub fn shape_id(&self) -> &str {
        &self.shape_id
    }

    #[must_use]
    pub fn visible_columns(&self) -> Vec<&str> {
        self.state.visible_columns()
    }

    /// Flip one column's visibility
    ///
    /// Returns the new visibility, or `None` for a column not in the grid.
    pub fn toggle_visibility(&mut self, column: &str) -> Option<bool> {
        let visible = self.state.visibility.get_mut(column)?;
        *visible = !*visible;
        let now = *visible;
        self.persist();
        Some(now)
    }

    /// Replace the column order
    ///
    /// Unknown and repeated names are dropped; columns missing from
    /// `new_order` keep their relative order at the end.
    pub fn reorder(&mut self, new_order: &[String]) {
        let mut order: Vec<String> = Vec::with_capacity(self.state.order.len());
        for column in new_order {
            if self.state.order.contains(column) && !order.contains(column) {
                order.push(column.clone());
            }
        }
        for column in &self.state.order {
            if !order.contains(column) {
                order.push(column.clone());
            }
        }
        self.state.order = order;
        self.persist();
    }

    /// Drag a column from position `from` to position `to`
    ///
    /// Out-of-range positions leave the order untouched.
    pub fn move_column(&mut self, from: usize, to: usize) {
        let len = self.state.order.len();
        if from >= len || to >= len || from == to {
            return;
        }
        let mut order = self.state.order.clone();
        let column = order.remove(from);
        order.insert(to, column);
        self.reorder(&order);
    }

    /// Advance `column` through none → asc → desc → none
    ///
    /// Sorting a different column starts it at ascending.
    pub fn sort(&mut self, column: &str) -> Option<&SortState> {
        if !self.columns.iter().any(|c| c == column) {
            return self.state.sort.as_ref();
        }
        self.state.sort = match self.state.sort.take() {
            Some(current) if current.column == column => match current.direction {
                SortDirection::Asc => Some(SortState::desc(column)),
                SortDirection::Desc => None,
            },
            _ => Some(SortState::asc(column)),
        };
        self.persist();
        self.state.sort.as_ref()
    }

    /// Overwrite order and visibility from a preset in one step
    pub fn apply_template(&mut self, template: &ColumnTemplate) {
        let (order, visibility) = template.layout_for(&self.columns);
        self.state.order = order;
        self.state.visibility = visibility;
        self.persist();
    }

    /// Make every column visible
    pub fn show_all(&mut self) {
        for visible in self.state.visibility.values_mut() {
            *visible = true;
        }
        self.persist();
    }

    /// Storage key for one part of the current shape's state
    #[must_use]
    pub fn storage_key(&self, part: &str) -> String {
        format!("{KEY_PREFIX}.{}.{part}", self.shape_id)
    }

    fn load<T: DeserializeOwned>(&self, part: &str) -> Option<T> {
        let raw = self.store.get(&self.storage_key(part))?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(shape = %self.shape_id, part, error = %e, "malformed stored column state ignored");
                None
            }
        }
    }

    fn persist(&self) {
        self.save("order", &self.state.order);
        self.save("visibility", &self.state.visibility);
        self.save("sort", &self.state.sort);
    }

    fn save<T: Serialize>(&self, part: &str, value: &T) {
        if self.shape_id.is_empty() {
            return;
        }
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(part, error = %e, "column state not serializable");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.storage_key(part), &encoded) {
            tracing::warn!(shape = %self.shape_id, part, error = %e, "column state not persisted");
        }
    }
}
