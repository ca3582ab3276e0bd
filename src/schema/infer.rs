//! Field inference from an entity tag or a sample row

use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::catalog::{EntityTag, common_fields, is_server_managed};
use super::error::{Result, SchemaError};
use super::types::{FieldDefinition, FieldKind};

static ISO_DATETIME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T").expect("static regex is valid"));

/// Mandatory relationship for team records
pub const DIVISION_CONFERENCE_FIELD: &str = "division_conference_id";

/// Where the field list comes from
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    /// A catalogued entity type
    Entity(EntityTag),
    /// One representative row of an ad-hoc result set
    Sample(Value),
}

/// Derive the editable fields for `source`
///
/// # Errors
///
/// Returns `SchemaError` if the sample row is not an object or has no
/// properties.
pub fn infer_fields(source: &FieldSource) -> Result<Vec<FieldDefinition>> {
    let fields = match source {
        FieldSource::Entity(tag) => catalog_fields_for(*tag),
        FieldSource::Sample(row) => sample_fields(row)?,
    };
    Ok(ensure_team_relationship(fields))
}

fn catalog_fields_for(tag: EntityTag) -> Vec<FieldDefinition> {
    let mut seen = HashSet::new();
    tag.catalog_fields()
        .into_iter()
        .chain(common_fields())
        .filter(|f| !is_server_managed(&f.name))
        .filter(|f| seen.insert(f.name.clone()))
        .collect()
}

fn sample_fields(row: &Value) -> Result<Vec<FieldDefinition>> {
    let object = row.as_object().ok_or(SchemaError::NotAnObject)?;
    if object.is_empty() {
        return Err(SchemaError::EmptySample);
    }
    Ok(object
        .iter()
        .filter(|(name, _)| !is_server_managed(name))
        .map(|(name, value)| FieldDefinition::new(name.as_str(), classify_value(value)))
        .collect())
}

/// Classify a sample value
#[must_use]
pub fn classify_value(value: &Value) -> FieldKind {
    match value {
        Value::Number(_) => FieldKind::Number,
        Value::Bool(_) => FieldKind::Boolean,
        Value::String(s) if ISO_DATETIME_PREFIX.is_match(s) => FieldKind::DateTime,
        _ => FieldKind::String,
    }
}

/// Team-like: has `name`, has `city` or `league_id`, and has no `sport`
#[must_use]
pub fn is_team_like(fields: &[FieldDefinition]) -> bool {
    let has = |name: &str| fields.iter().any(|f| f.name == name);
    has("name") && (has("city") || has("league_id")) && !has("sport")
}

fn ensure_team_relationship(mut fields: Vec<FieldDefinition>) -> Vec<FieldDefinition> {
    if !is_team_like(&fields) {
        return fields;
    }
    match fields.iter_mut().find(|f| f.name == DIVISION_CONFERENCE_FIELD) {
        Some(existing) => existing.required = true,
        None => fields.push(
            FieldDefinition::new(DIVISION_CONFERENCE_FIELD, FieldKind::String)
                .required()
                .with_description("Division / Conference"),
        ),
    }
    fields
}
