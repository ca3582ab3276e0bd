//! Column layout state for one result shape

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::schema::is_identifier_name;

/// Sort direction of the active sort column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Active single-column sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    #[must_use]
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Visibility, order and sort of a grid's columns
///
/// `visibility` is a sorted map so its encoding is stable across saves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnState {
    pub visibility: BTreeMap<String, bool>,
    pub order: Vec<String>,
    pub sort: Option<SortState>,
}

/// Default visibility of a column on first sight of its shape
#[must_use]
pub fn default_visible(column: &str, show_identifiers: bool) -> bool {
    show_identifiers || !is_identifier_name(column)
}

impl ColumnState {
    /// Fresh state: columns in given order, identifiers hidden unless requested
    #[must_use]
    pub fn with_defaults(columns: &[String], show_identifiers: bool) -> Self {
        let order = dedup(columns.iter().cloned());
        let visibility = order
            .iter()
            .map(|c| (c.clone(), default_visible(c, show_identifiers)))
            .collect();
        Self {
            visibility,
            order,
            sort: None,
        }
    }

    /// Fit stored state to the current column set
    ///
    /// New columns are appended with default visibility; entries for
    /// columns that no longer exist are dropped, including the sort.
    #[must_use]
    pub fn reconciled(mut self, columns: &[String], show_identifiers: bool) -> Self {
        let current: Vec<String> = dedup(columns.iter().cloned());
        let mut order: Vec<String> = dedup(self.order.into_iter())
            .into_iter()
            .filter(|c| current.contains(c))
            .collect();
        for column in &current {
            if !order.contains(column) {
                order.push(column.clone());
            }
        }
        self.visibility.retain(|c, _| current.contains(c));
        for column in &current {
            self.visibility
                .entry(column.clone())
                .or_insert_with(|| default_visible(column, show_identifiers));
        }
        if self.sort.as_ref().is_some_and(|s| !current.contains(&s.column)) {
            self.sort = None;
        }
        self.order = order;
        self
    }

    #[must_use]
    pub fn is_visible(&self, column: &str) -> bool {
        self.visibility.get(column).copied().unwrap_or(false)
    }

    /// Visible columns in display order
    #[must_use]
    pub fn visible_columns(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|c| self.is_visible(c))
            .map(String::as_str)
            .collect()
    }

    /// Sort `rows` by the active sort; no-op without one
    ///
    /// Nulls and missing values always sort last. The sort is stable.
    pub fn sort_rows(&self, rows: &mut [Value]) {
        let Some(sort) = &self.sort else {
            return;
        };
        rows.sort_by(|a, b| {
            let (a, b) = (a.get(&sort.column), b.get(&sort.column));
            match (is_blank(a), is_blank(b)) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let ord = compare_values(a.unwrap_or(&Value::Null), b.unwrap_or(&Value::Null));
                    match sort.direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                }
            }
        });
    }
}

fn dedup(columns: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for column in columns {
        if !out.contains(&column) {
            out.push(column);
        }
    }
    out
}

fn is_blank(value: Option<&Value>) -> bool {
    value.is_none_or(Value::is_null)
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
