use crate::config::ConfigError;

/// Every descriptor the query layer may interpolate into statement text.
const ALLOWED_TABLES: [EntityTable; 2] = [EMPLOYEE_TABLE, TEAM_TABLE];

/// Static description of where an entity kind lives in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTable {
    pub base_table: &'static str,
    /// Column in the base table, `employee_events` and `notes` holding the id.
    pub key_column: &'static str,
    /// SQL expression producing the display name from base table columns.
    /// Never NULL, so a row with missing name parts still has a label.
    pub label_expr: &'static str,
}

pub const EMPLOYEE_TABLE: EntityTable = EntityTable {
    base_table: "employee",
    key_column: "employee_id",
    label_expr: "TRIM(COALESCE(first_name, '') || ' ' || COALESCE(last_name, ''))",
};

pub const TEAM_TABLE: EntityTable = EntityTable {
    base_table: "team",
    key_column: "team_id",
    label_expr: "COALESCE(team_name, '')",
};

/// Statement text derived from a validated table descriptor.
#[derive(Debug, Clone)]
pub(crate) struct QueryPlan {
    pub(crate) list: String,
    pub(crate) name: String,
    pub(crate) event_series: String,
    pub(crate) notes: String,
}

impl EntityTable {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if ALLOWED_TABLES.contains(self) {
            Ok(())
        } else {
            Err(ConfigError::InvalidEntityTable {
                table: self.base_table.to_string(),
                column: self.key_column.to_string(),
            })
        }
    }

    pub(crate) fn plan(&self) -> Result<QueryPlan, ConfigError> {
        self.validate()?;
        let Self {
            base_table,
            key_column,
            label_expr,
        } = *self;

        Ok(QueryPlan {
            list: format!(
                "SELECT {label_expr} AS label, {key_column} FROM {base_table} ORDER BY {key_column}"
            ),
            name: format!("SELECT {label_expr} AS label FROM {base_table} WHERE {key_column} = ?1"),
            event_series: format!(
                "SELECT event_date,
                        SUM(positive_events) AS total_positive_events,
                        SUM(negative_events) AS total_negative_events
                 FROM employee_events
                 WHERE {key_column} = ?1
                 GROUP BY event_date
                 ORDER BY event_date"
            ),
            notes: format!(
                "SELECT note_date, note
                 FROM notes
                 WHERE {key_column} = ?1
                 ORDER BY note_date"
            ),
        })
    }
}
