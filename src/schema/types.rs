//! Field definitions and value coercion
//!
//! A `FieldDefinition` describes one editable column. Its `FieldKind`
//! decides which input the shell renders and how entered values are
//! coerced before they go into a patch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use heck::ToTitleCase;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Primitive kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
}

impl FieldKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
        }
    }

    /// Kinds shown in the "Dates & Numbers" category
    #[must_use]
    pub const fn is_temporal_or_numeric(self) -> bool {
        !matches!(self, Self::String)
    }

    /// Coerce a user-entered value into this kind
    ///
    /// `null` and the empty string both mean "clear the field" and come back
    /// as `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason if the value cannot represent this kind.
    pub fn coerce(self, value: &Value) -> Result<Value, String> {
        if value.is_null() || value.as_str().is_some_and(|s| s.trim().is_empty()) {
            return Ok(Value::Null);
        }
        match self {
            Self::String => Ok(match value {
                Value::String(_) => value.clone(),
                Value::Number(n) => Value::String(n.to_string()),
                Value::Bool(b) => Value::String(b.to_string()),
                other => Value::String(other.to_string()),
            }),
            Self::Number => coerce_number(value),
            Self::Boolean => coerce_bool(value),
            Self::Date => {
                let text = expect_text(value, self)?;
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map(|_| Value::String(text.to_string()))
                    .map_err(|e| format!("'{text}' is not a date (YYYY-MM-DD): {e}"))
            }
            Self::DateTime => {
                let text = expect_text(value, self)?;
                let valid = DateTime::parse_from_rfc3339(text).is_ok()
                    || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").is_ok()
                    || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").is_ok();
                if valid {
                    Ok(Value::String(text.to_string()))
                } else {
                    Err(format!("'{text}' is not a date-time"))
                }
            }
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn expect_text(value: &Value, kind: FieldKind) -> Result<&str, String> {
    value
        .as_str()
        .map(str::trim)
        .ok_or_else(|| format!("expected text for a {kind} field, got {value}"))
}

fn coerce_number(value: &Value) -> Result<Value, String> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Value::Number(i.into()));
            }
            s.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("'{s}' is not a number"))
        }
        other => Err(format!("{other} is not a number")),
    }
}

fn coerce_bool(value: &Value) -> Result<Value, String> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::Number(n) if n.as_i64() == Some(0) => Ok(Value::Bool(false)),
        Value::Number(n) if n.as_i64() == Some(1) => Ok(Value::Bool(true)),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "0" | "no" => Ok(Value::Bool(false)),
            other => Err(format!("'{other}' is not a boolean")),
        },
        other => Err(format!("{other} is not a boolean")),
    }
}

/// One editable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub description: String,
}

impl FieldDefinition {
    /// Create an optional field with a description derived from its name
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let description = humanize(&name);
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this field holds a foreign identifier
    #[must_use]
    pub fn is_reference(&self) -> bool {
        is_reference_name(&self.name)
    }

    /// Referenced entity name (`league_id` → `league`)
    #[must_use]
    pub fn referenced_entity(&self) -> Option<&str> {
        if self.is_reference() {
            self.name.strip_suffix("_id")
        } else {
            None
        }
    }
}

/// `true` for names ending in `_id` other than bare `id`
#[must_use]
pub fn is_reference_name(name: &str) -> bool {
    name != "id" && name.ends_with("_id")
}

/// `true` for `id` and any reference name
#[must_use]
pub fn is_identifier_name(name: &str) -> bool {
    name == "id" || name.ends_with("_id")
}

/// Human-readable label for a field name (`founded_year` → `Founded Year`)
#[must_use]
pub fn humanize(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(ToTitleCase::to_title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display bucket for the edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldCategory {
    BasicInformation,
    Relationships,
    DatesAndNumbers,
    Other,
}

impl FieldCategory {
    /// All categories in classification priority order
    pub const ALL: [Self; 4] = [
        Self::BasicInformation,
        Self::Relationships,
        Self::DatesAndNumbers,
        Self::Other,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BasicInformation => "Basic Information",
            Self::Relationships => "Relationships",
            Self::DatesAndNumbers => "Dates & Numbers",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
