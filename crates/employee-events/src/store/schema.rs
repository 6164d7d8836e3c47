use super::{QueryError, QueryExecutor, Row};
use rusqlite::types::Value;
use serde::Serialize;

/// Tables the dashboard reads from.
pub const REQUIRED_TABLES: [&str; 4] = ["employee", "team", "employee_events", "notes"];

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub row_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    pub tables: Vec<TableInfo>,
    pub missing: Vec<&'static str>,
}

impl SchemaReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn table_names(executor: &QueryExecutor) -> Result<Vec<String>, QueryError> {
    executor
        .query(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
            &[],
        )?
        .into_iter()
        .map(|row| match row.into_iter().next() {
            Some(Value::Text(name)) => Ok(name),
            other => Err(QueryError::UnexpectedValue {
                column: "name".to_string(),
                detail: format!("{other:?}"),
            }),
        })
        .collect()
}

/// Names of required tables absent from the database.
pub fn verify(executor: &QueryExecutor) -> Result<Vec<&'static str>, QueryError> {
    let present = table_names(executor)?;
    Ok(REQUIRED_TABLES
        .into_iter()
        .filter(|required| !present.iter().any(|name| name == required))
        .collect())
}

/// Describes every table with its columns and row count.
pub fn inspect(executor: &QueryExecutor) -> Result<SchemaReport, QueryError> {
    let names = table_names(executor)?;
    let mut tables = Vec::with_capacity(names.len());

    for name in &names {
        let columns = executor
            .frame_query(
                "SELECT name, type FROM pragma_table_info(?1) ORDER BY cid",
                &[Value::Text(name.clone())],
            )?;
        let column_names = columns.text_column("name")?;
        let column_types = columns.text_column("type")?;

        let count_sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(name));
        let row_count = count_value(executor.query(&count_sql, &[])?)?;

        tables.push(TableInfo {
            name: name.clone(),
            columns: column_names
                .into_iter()
                .zip(column_types)
                .map(|(name, declared_type)| ColumnInfo {
                    name,
                    declared_type,
                })
                .collect(),
            row_count,
        });
    }

    let missing = REQUIRED_TABLES
        .into_iter()
        .filter(|required| !names.iter().any(|name| name == required))
        .collect();

    Ok(SchemaReport { tables, missing })
}

fn count_value(rows: Vec<Row>) -> Result<i64, QueryError> {
    match rows.into_iter().next().and_then(|row| row.into_iter().next()) {
        Some(Value::Integer(count)) => Ok(count),
        other => Err(QueryError::UnexpectedValue {
            column: "COUNT(*)".to_string(),
            detail: format!("{other:?}"),
        }),
    }
}

fn quote_identifier(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}
