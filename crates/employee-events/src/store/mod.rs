//! Single-statement read access to the employee events database.
//!
//! Every call opens its own read-only connection, runs exactly one statement
//! and drops the connection before returning, whether or not the statement
//! succeeded. There is no pooling and no transaction handling.

mod frame;
pub mod schema;

pub use frame::Frame;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A fetched row in column order.
pub type Row = Vec<Value>;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid argument: expected an integer id, but got {found}")]
    InvalidArgument { found: &'static str },
    #[error("database file not found at {}", path.display())]
    MissingDatabase { path: PathBuf },
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("unexpected value in column '{column}': {detail}")]
    UnexpectedValue { column: String, detail: String },
}

impl QueryError {
    /// Errors raised by the store itself rather than by caller input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            QueryError::MissingDatabase { .. }
                | QueryError::Sqlite(_)
                | QueryError::UnexpectedValue { .. }
        )
    }
}

/// Executes parameterized statements against one SQLite file.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    db_path: PathBuf,
}

impl QueryExecutor {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Returns every row as a positional tuple.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, QueryError> {
        debug!(sql = sql.trim(), ?params, db = %self.db_path.display(), "executing query");
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let width = stmt.column_count();
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                (0..width)
                    .map(|idx| row.get::<_, Value>(idx))
                    .collect::<rusqlite::Result<Row>>()
            })?
            .collect::<Result<Vec<Row>, _>>()?;
        debug!(rows = rows.len(), "query complete");
        Ok(rows)
    }

    /// Returns the result as a labeled frame. Column labels are kept even when
    /// the statement matches no rows.
    pub fn frame_query(&self, sql: &str, params: &[Value]) -> Result<Frame, QueryError> {
        debug!(sql = sql.trim(), ?params, db = %self.db_path.display(), "executing frame query");
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = columns.len();
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                (0..width)
                    .map(|idx| row.get::<_, Value>(idx))
                    .collect::<rusqlite::Result<Row>>()
            })?
            .collect::<Result<Vec<Row>, _>>()?;
        Ok(Frame::new(columns, rows))
    }

    fn connect(&self) -> Result<Connection, QueryError> {
        if !self.db_path.is_file() {
            return Err(QueryError::MissingDatabase {
                path: self.db_path.clone(),
            });
        }
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }
}
