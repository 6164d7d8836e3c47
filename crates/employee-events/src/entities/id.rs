use crate::store::QueryError;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer primary key of an employee or team.
///
/// Every id entering the query layer passes through one of the conversions
/// below, so non-integer input is rejected before any statement runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parses path or form text such as `"7"`.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::InvalidArgument { found: "empty string" });
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Ok(Self(value));
        }
        let found = if trimmed.parse::<f64>().is_ok() {
            "float"
        } else {
            "string"
        };
        Err(QueryError::InvalidArgument { found })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for EntityId {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Value::Integer(id.0)
    }
}

impl TryFrom<f64> for EntityId {
    type Error = QueryError;

    fn try_from(_: f64) -> Result<Self, Self::Error> {
        Err(QueryError::InvalidArgument { found: "float" })
    }
}

/// Dynamic values keep their declared type: `"7"` is a string, not an id.
impl TryFrom<&serde_json::Value> for EntityId {
    type Error = QueryError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;
        match value {
            Json::Number(number) => number
                .as_i64()
                .map(Self)
                .ok_or(QueryError::InvalidArgument { found: "float" }),
            Json::String(_) => Err(QueryError::InvalidArgument { found: "string" }),
            Json::Null => Err(QueryError::InvalidArgument { found: "null" }),
            Json::Bool(_) => Err(QueryError::InvalidArgument { found: "bool" }),
            Json::Array(_) => Err(QueryError::InvalidArgument { found: "array" }),
            Json::Object(_) => Err(QueryError::InvalidArgument { found: "object" }),
        }
    }
}

impl TryFrom<Option<i64>> for EntityId {
    type Error = QueryError;

    fn try_from(value: Option<i64>) -> Result<Self, Self::Error> {
        value
            .map(Self)
            .ok_or(QueryError::InvalidArgument { found: "null" })
    }
}
