//! Grouping of fields into form sections

use std::collections::BTreeMap;

use super::types::{FieldCategory, FieldDefinition, is_reference_name};

const BASIC_NAMES: [&str; 8] = [
    "name",
    "nickname",
    "type",
    "description",
    "region",
    "city",
    "country",
    "state",
];

/// Category of a single field, checked in fixed priority order
#[must_use]
pub fn classify(field: &FieldDefinition) -> FieldCategory {
    let name = field.name.as_str();
    if BASIC_NAMES.contains(&name) {
        FieldCategory::BasicInformation
    } else if is_reference_name(name) {
        FieldCategory::Relationships
    } else if field.kind.is_temporal_or_numeric() || name.contains("date") || name.contains("year")
    {
        FieldCategory::DatesAndNumbers
    } else {
        FieldCategory::Other
    }
}

/// Group `fields` by category
///
/// Keys iterate in priority order; empty categories are absent and each
/// field appears exactly once, in input order.
#[must_use]
pub fn categorize(fields: &[FieldDefinition]) -> BTreeMap<FieldCategory, Vec<FieldDefinition>> {
    let mut groups: BTreeMap<FieldCategory, Vec<FieldDefinition>> = BTreeMap::new();
    for field in fields {
        groups.entry(classify(field)).or_default().push(field.clone());
    }
    groups
}
