//! Sparse field patches

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::{EditError, Result};
use crate::schema::FieldDefinition;

/// Field → new value; `null` clears the field
///
/// Only selected fields are present, so applying a patch never touches
/// unselected fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedFieldPatch {
    fields: BTreeMap<String, Value>,
}

impl SelectedFieldPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a patch from the form's checkbox and value maps
    ///
    /// Values are coerced to each field's kind; a selected field without a
    /// value clears it.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NoFieldsSelected` if nothing is selected, or
    /// `EditError::InvalidValue` if a value does not fit its field.
    pub fn from_selection(
        fields: &[FieldDefinition],
        selection: &BTreeMap<String, bool>,
        values: &BTreeMap<String, Value>,
    ) -> Result<Self> {
        let mut patch = Self::new();
        for field in fields {
            if !selection.get(&field.name).copied().unwrap_or(false) {
                continue;
            }
            let raw = values.get(&field.name).unwrap_or(&Value::Null);
            let value = field.kind.coerce(raw).map_err(|reason| EditError::InvalidValue {
                field: field.name.clone(),
                reason,
            })?;
            patch.fields.insert(field.name.clone(), value);
        }
        if patch.is_empty() {
            return Err(EditError::NoFieldsSelected);
        }
        Ok(patch)
    }

    /// Set one field (builder style, no coercion)
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Write every patched field onto `row`
    ///
    /// # Errors
    ///
    /// Returns a reason if `row` is not a JSON object.
    pub fn apply_to(&self, row: &mut Value) -> std::result::Result<(), String> {
        let found = kind_name(row);
        let object = row
            .as_object_mut()
            .ok_or_else(|| format!("expected an object row, found {found}"))?;
        for (field, value) in &self.fields {
            object.insert(field.clone(), value.clone());
        }
        Ok(())
    }
}

const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
