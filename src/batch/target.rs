use serde_json::Value;
use std::collections::BTreeSet;

use crate::schema::{EntityTag, FieldSource, SchemaError};

/// Records a bulk edit applies to
#[derive(Debug, Clone, PartialEq)]
pub enum EditTargetSet {
    /// Persisted entities, updated through the remote service
    ByIdentifier { entity: EntityTag, ids: Vec<String> },
    /// In-memory result rows, patched on a copy of `rows`
    ByIndex {
        indices: BTreeSet<usize>,
        rows: Vec<Value>,
    },
}

impl EditTargetSet {
    #[must_use]
    pub fn by_ids<I, S>(entity: EntityTag, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ByIdentifier {
            entity,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn by_indices(indices: impl IntoIterator<Item = usize>, rows: Vec<Value>) -> Self {
        Self::ByIndex {
            indices: indices.into_iter().collect(),
            rows,
        }
    }

    /// Number of targets
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::ByIdentifier { ids, .. } => ids.len(),
            Self::ByIndex { indices, .. } => indices.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Where the edit form's fields come from for these targets
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NoSampleRow` when no selected index points at
    /// a backing row.
    pub fn field_source(&self) -> Result<FieldSource, SchemaError> {
        match self {
            Self::ByIdentifier { entity, .. } => Ok(FieldSource::Entity(*entity)),
            Self::ByIndex { indices, rows } => indices
                .iter()
                .find_map(|&i| rows.get(i))
                .map(|row| FieldSource::Sample(row.clone()))
                .ok_or(SchemaError::NoSampleRow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_len_and_dedup_indices() {
        let targets = EditTargetSet::by_indices([2, 0, 2], vec![json!({}), json!({}), json!({})]);
        assert_eq!(targets.len(), 2);
        assert_eq!(EditTargetSet::by_ids(EntityTag::Team, ["a", "b"]).len(), 2);
    }

    #[test]
    fn test_field_source_uses_first_selected_row() {
        let rows = vec![json!({"a": 1}), json!({"b": 2})];
        let targets = EditTargetSet::by_indices([1, 7], rows);
        assert_eq!(targets.field_source(), Ok(FieldSource::Sample(json!({"b": 2}))));
    }

    #[test]
    fn test_field_source_without_rows() {
        let targets = EditTargetSet::by_indices([3], vec![]);
        assert_eq!(targets.field_source(), Err(SchemaError::NoSampleRow));
    }
}
