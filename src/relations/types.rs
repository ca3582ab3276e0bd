use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// One selectable value for a reference field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl RelationshipOption {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            sort_key: None,
        }
    }

    #[must_use]
    pub fn with_sort_key(mut self, key: impl Into<String>) -> Self {
        self.sort_key = Some(key.into());
        self
    }
}

/// Read-only option list shared by every consumer of a field
pub type OptionList = Arc<[RelationshipOption]>;

/// Resolved options keyed by field name
///
/// Entries are replaced wholesale; a later insert for the same field wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipOptions {
    by_field: HashMap<String, OptionList>,
}

impl RelationshipOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, options: OptionList) {
        self.by_field.insert(field.into(), options);
    }

    /// Options for `field`; `None` means the editor falls back to free text
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&OptionList> {
        self.by_field.get(field)
    }

    /// Options for `field`, empty when unresolved
    #[must_use]
    pub fn options_for(&self, field: &str) -> &[RelationshipOption] {
        self.by_field.get(field).map(|o| &**o).unwrap_or(&[])
    }

    /// Label for a stored identifier, if that option is known
    #[must_use]
    pub fn label_for(&self, field: &str, id: &str) -> Option<&str> {
        self.options_for(field)
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.by_field.contains_key(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_field.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionList)> {
        self.by_field.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Identifier of a reference record as a string (numbers are stringified)
#[must_use]
pub fn record_id(record: &Value) -> Option<String> {
    id_string(record.get("id")?)
}

/// String form of an identifier value
#[must_use]
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Display name of a reference record
#[must_use]
pub fn record_name(record: &Value) -> Option<&str> {
    record.get("name").and_then(Value::as_str)
}
