//! Query objects for the two reportable entities.

mod employee;
mod id;
mod table;
mod team;

pub use employee::Employee;
pub use id::EntityId;
pub use table::{EntityTable, EMPLOYEE_TABLE, TEAM_TABLE};
pub use team::Team;

use crate::config::ConfigError;
use crate::store::{Frame, QueryError, QueryExecutor, Row};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const EVENT_SERIES_COLUMNS: [&str; 3] =
    ["event_date", "total_positive_events", "total_negative_events"];
pub const NOTES_COLUMNS: [&str; 2] = ["note_date", "note"];
pub const FEATURE_COLUMNS: [&str; 2] = ["positive_events", "negative_events"];

/// The subject a report is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Employee,
    Team,
}

impl EntityKind {
    pub const fn ordered() -> [Self; 2] {
        [Self::Employee, Self::Team]
    }

    /// Form label, also the `profile_type` value.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Team => "Team",
        }
    }

    /// Lowercase slug used in routes and artifact names.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Team => "team",
        }
    }

    /// Parses a submitted `profile_type`. Only the exact form labels are accepted.
    pub fn from_profile_type(raw: &str) -> Option<Self> {
        match raw {
            "Employee" => Some(Self::Employee),
            "Team" => Some(Self::Team),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Self::Employee),
            "team" => Ok(Self::Team),
            other => Err(format!("unknown entity kind '{other}'")),
        }
    }
}

/// A `(label, id)` pair from an entity listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityOption {
    pub label: String,
    pub id: EntityId,
}

/// Capabilities shared by every entity kind.
pub trait EntityQuery: Send + Sync {
    fn kind(&self) -> EntityKind;

    fn executor(&self) -> &QueryExecutor;

    /// Every entity in the base table as `(display label, id)`, ordered by id.
    fn list(&self) -> Result<Vec<EntityOption>, QueryError>;

    /// SQL returning the display name of one entity.
    fn name_sql(&self) -> &str;

    /// SQL returning the per-row model features for one entity.
    fn features_sql(&self) -> &str;

    /// SQL returning per-date event totals for one entity.
    fn event_series_sql(&self) -> &str;

    /// SQL returning date-ordered notes for one entity.
    fn notes_sql(&self) -> &str;

    /// Rows holding the display name; empty when the id does not exist.
    fn resolve_name(&self, id: EntityId) -> Result<Vec<Row>, QueryError> {
        self.executor().query(self.name_sql(), &[Value::from(id)])
    }

    /// First display name for the id, if any.
    /// `None` only when no row matches the id; a row whose label is NULL
    /// still names an existing entity and yields an empty string.
    fn display_name(&self, id: EntityId) -> Result<Option<String>, QueryError> {
        let rows = self.resolve_name(id)?;
        Ok(rows.into_iter().next().map(|row| {
            match row.into_iter().next() {
                Some(Value::Text(name)) => name,
                Some(Value::Integer(number)) => number.to_string(),
                Some(Value::Real(number)) => number.to_string(),
                _ => String::new(),
            }
        }))
    }

    /// Positive and negative totals per event date.
    fn event_series(&self, id: EntityId) -> Result<Frame, QueryError> {
        let frame = self
            .executor()
            .frame_query(self.event_series_sql(), &[Value::from(id)])?;
        if frame.is_empty() {
            return Ok(Frame::empty(&EVENT_SERIES_COLUMNS));
        }
        Ok(frame)
    }

    fn notes(&self, id: EntityId) -> Result<Frame, QueryError> {
        let frame = self.executor().frame_query(self.notes_sql(), &[Value::from(id)])?;
        if frame.is_empty() {
            return Ok(Frame::empty(&NOTES_COLUMNS));
        }
        Ok(frame)
    }

    /// Classifier input: one row for an employee, one row per member for a team.
    fn model_features(&self, id: EntityId) -> Result<Frame, QueryError> {
        let frame = self
            .executor()
            .frame_query(self.features_sql(), &[Value::from(id)])?;
        if frame.is_empty() {
            return Ok(Frame::empty(&FEATURE_COLUMNS));
        }
        Ok(frame)
    }
}

/// Query objects for every kind, built once at startup.
#[derive(Debug, Clone)]
pub struct EntityCatalog {
    employee: Employee,
    team: Team,
}

impl EntityCatalog {
    pub fn new(executor: QueryExecutor) -> Result<Self, ConfigError> {
        Ok(Self {
            employee: Employee::new(executor.clone())?,
            team: Team::new(executor)?,
        })
    }

    pub fn get(&self, kind: EntityKind) -> &dyn EntityQuery {
        match kind {
            EntityKind::Employee => &self.employee,
            EntityKind::Team => &self.team,
        }
    }

    pub fn executor(&self) -> &QueryExecutor {
        self.employee.executor()
    }
}

pub(crate) fn options_from_rows(rows: Vec<Row>) -> Result<Vec<EntityOption>, QueryError> {
    rows.into_iter()
        .map(|row| {
            let mut values = row.into_iter();
            let label = match values.next() {
                Some(Value::Text(label)) => label,
                Some(Value::Null) | None => String::new(),
                Some(other) => format!("{other:?}"),
            };
            let id = match values.next() {
                Some(Value::Integer(id)) => EntityId::new(id),
                other => {
                    return Err(QueryError::UnexpectedValue {
                        column: "id".to_string(),
                        detail: format!("{other:?}"),
                    })
                }
            };
            Ok(EntityOption { label, id })
        })
        .collect()
}
