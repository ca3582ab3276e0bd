//! Named column presets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::EntityTag;

/// Named column preset applied in one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTemplate {
    pub name: String,
    /// Preferred leading order; other columns follow in grid order
    pub order: Vec<String>,
    /// Columns absent from this map are hidden
    pub visibility: BTreeMap<String, bool>,
}

impl ColumnTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>, order: Vec<String>, visibility: BTreeMap<String, bool>) -> Self {
        Self {
            name: name.into(),
            order,
            visibility,
        }
    }

    /// Show exactly `columns`, in that order
    #[must_use]
    pub fn showing(name: impl Into<String>, columns: &[&str]) -> Self {
        let order: Vec<String> = columns.iter().map(|c| (*c).to_string()).collect();
        let visibility = order.iter().map(|c| (c.clone(), true)).collect();
        Self::new(name, order, visibility)
    }

    /// The columns an entity's default list view shows: `name`, then its catalog fields
    #[must_use]
    pub fn entity_default(entity: EntityTag) -> Self {
        let catalog = entity.catalog_fields();
        let columns: Vec<&str> = std::iter::once("name")
            .chain(catalog.iter().map(|f| f.name.as_str()))
            .collect();
        Self::showing(format!("{entity} default"), &columns)
    }

    /// Order and visibility this template gives a grid with `columns`
    #[must_use]
    pub fn layout_for(&self, columns: &[String]) -> (Vec<String>, BTreeMap<String, bool>) {
        let mut order: Vec<String> = Vec::with_capacity(columns.len());
        for column in self.order.iter().chain(columns) {
            if columns.contains(column) && !order.contains(column) {
                order.push(column.clone());
            }
        }
        let visibility = order
            .iter()
            .map(|c| (c.clone(), self.visibility.get(c).copied().unwrap_or(false)))
            .collect();
        (order, visibility)
    }
}
