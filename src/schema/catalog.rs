//! Static field catalog per entity type
//!
//! `EntityTag` is the closed set of entity types the editor knows about.
//! Each tag maps to its editable fields; `common_fields` are appended to
//! every entity and server-managed names are filtered afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SchemaError;
use super::types::{FieldDefinition, FieldKind};

/// Known entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTag {
    League,
    DivisionConference,
    Team,
    Player,
    Game,
    Stadium,
    Broadcast,
    ProductionCompany,
    Brand,
}

impl EntityTag {
    pub const ALL: [Self; 9] = [
        Self::League,
        Self::DivisionConference,
        Self::Team,
        Self::Player,
        Self::Game,
        Self::Stadium,
        Self::Broadcast,
        Self::ProductionCompany,
        Self::Brand,
    ];

    /// Wire name (`division_conference`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::League => "league",
            Self::DivisionConference => "division_conference",
            Self::Team => "team",
            Self::Player => "player",
            Self::Game => "game",
            Self::Stadium => "stadium",
            Self::Broadcast => "broadcast",
            Self::ProductionCompany => "production_company",
            Self::Brand => "brand",
        }
    }

    /// Whether `<tag>_id` fields get their options from the reference service
    ///
    /// Every known tag is currently resolvable; the hook stays so a tag can
    /// be catalogued without being offered as a dropdown.
    #[must_use]
    pub const fn is_resolvable(self) -> bool {
        true
    }

    /// Entity-specific catalog fields, without the common ones
    #[must_use]
    pub fn catalog_fields(self) -> Vec<FieldDefinition> {
        use FieldKind::{Boolean, Date, DateTime, Number};
        match self {
            Self::League => vec![
                FieldDefinition::new("nickname", FieldKind::String),
                FieldDefinition::new("sport", FieldKind::String).required(),
                FieldDefinition::new("logo_url", FieldKind::String),
            ],
            Self::DivisionConference => vec![
                FieldDefinition::new("nickname", FieldKind::String),
                FieldDefinition::new("type", FieldKind::String).required(),
                FieldDefinition::new("region", FieldKind::String),
                FieldDefinition::new("league_id", FieldKind::String).required(),
            ],
            Self::Team => vec![
                FieldDefinition::new("nickname", FieldKind::String),
                FieldDefinition::new("city", FieldKind::String).required(),
                FieldDefinition::new("state", FieldKind::String),
                FieldDefinition::new("country", FieldKind::String).required(),
                FieldDefinition::new("founded_year", Number),
                FieldDefinition::new("league_id", FieldKind::String).required(),
                FieldDefinition::new("stadium_id", FieldKind::String),
                FieldDefinition::new("logo_url", FieldKind::String),
            ],
            Self::Player => vec![
                FieldDefinition::new("position", FieldKind::String),
                FieldDefinition::new("jersey_number", Number),
                FieldDefinition::new("birth_date", Date),
                FieldDefinition::new("college", FieldKind::String),
                FieldDefinition::new("team_id", FieldKind::String),
            ],
            Self::Game => vec![
                FieldDefinition::new("home_team_id", FieldKind::String).required(),
                FieldDefinition::new("away_team_id", FieldKind::String).required(),
                FieldDefinition::new("stadium_id", FieldKind::String),
                FieldDefinition::new("date", DateTime).required(),
                FieldDefinition::new("season_year", Number),
                FieldDefinition::new("status", FieldKind::String),
                FieldDefinition::new("home_score", Number),
                FieldDefinition::new("away_score", Number),
            ],
            Self::Stadium => vec![
                FieldDefinition::new("city", FieldKind::String).required(),
                FieldDefinition::new("state", FieldKind::String),
                FieldDefinition::new("country", FieldKind::String).required(),
                FieldDefinition::new("capacity", Number),
                FieldDefinition::new("surface", FieldKind::String),
                FieldDefinition::new("roof_type", FieldKind::String),
                FieldDefinition::new("opened_year", Number),
            ],
            Self::Broadcast => vec![
                FieldDefinition::new("game_id", FieldKind::String).required(),
                FieldDefinition::new("production_company_id", FieldKind::String),
                FieldDefinition::new("type", FieldKind::String),
                FieldDefinition::new("territory", FieldKind::String),
                FieldDefinition::new("start_time", DateTime),
                FieldDefinition::new("is_primary", Boolean),
            ],
            Self::ProductionCompany => vec![
                FieldDefinition::new("brand_id", FieldKind::String),
                FieldDefinition::new("country", FieldKind::String),
            ],
            Self::Brand => vec![
                FieldDefinition::new("type", FieldKind::String),
                FieldDefinition::new("country", FieldKind::String),
            ],
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityTag {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownEntity(s.to_string()))
    }
}

/// Fields every entity carries
#[must_use]
pub fn common_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("name", FieldKind::String).required(),
        FieldDefinition::new("created_at", FieldKind::DateTime),
        FieldDefinition::new("updated_at", FieldKind::DateTime),
    ]
}

/// Names owned by the server and never offered for editing
pub const SERVER_MANAGED: [&str; 3] = ["id", "created_at", "updated_at"];

#[must_use]
pub fn is_server_managed(name: &str) -> bool {
    SERVER_MANAGED.contains(&name)
}
