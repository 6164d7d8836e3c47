use super::{QueryError, Row};
use rusqlite::types::Value;

/// Column-labeled query result used for statistics and notes lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// A frame with the given labels and no rows.
    pub fn empty(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Integer view of a column; NULL becomes `None`. Whole-number reals are
    /// accepted because SQLite aggregates may widen integer sums.
    pub fn i64_column(&self, name: &str) -> Result<Vec<Option<i64>>, QueryError> {
        let idx = self.require_column(name)?;
        self.rows
            .iter()
            .map(|row| match &row[idx] {
                Value::Null => Ok(None),
                Value::Integer(value) => Ok(Some(*value)),
                Value::Real(value) if value.fract() == 0.0 => Ok(Some(*value as i64)),
                other => Err(unexpected(name, other)),
            })
            .collect()
    }

    /// Float view of a column; NULL becomes `None`.
    pub fn f64_column(&self, name: &str) -> Result<Vec<Option<f64>>, QueryError> {
        let idx = self.require_column(name)?;
        self.rows
            .iter()
            .map(|row| match &row[idx] {
                Value::Null => Ok(None),
                Value::Integer(value) => Ok(Some(*value as f64)),
                Value::Real(value) => Ok(Some(*value)),
                other => Err(unexpected(name, other)),
            })
            .collect()
    }

    /// Text view of a column. Numbers are rendered; NULL becomes an empty string.
    pub fn text_column(&self, name: &str) -> Result<Vec<String>, QueryError> {
        let idx = self.require_column(name)?;
        self.rows
            .iter()
            .map(|row| match &row[idx] {
                Value::Null => Ok(String::new()),
                Value::Text(text) => Ok(text.clone()),
                Value::Integer(value) => Ok(value.to_string()),
                Value::Real(value) => Ok(value.to_string()),
                other => Err(unexpected(name, other)),
            })
            .collect()
    }

    fn require_column(&self, name: &str) -> Result<usize, QueryError> {
        self.column_index(name)
            .ok_or_else(|| QueryError::UnexpectedValue {
                column: name.to_string(),
                detail: format!("column missing; frame has [{}]", self.columns.join(", ")),
            })
    }
}

fn unexpected(column: &str, value: &Value) -> QueryError {
    QueryError::UnexpectedValue {
        column: column.to_string(),
        detail: format!("{:?}", value.data_type()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        Frame::new(
            vec!["event_date".to_string(), "total".to_string()],
            vec![
                vec![Value::Text("2023-01-02".to_string()), Value::Integer(3)],
                vec![Value::Text("2023-01-03".to_string()), Value::Null],
                vec![Value::Text("2023-01-04".to_string()), Value::Real(4.0)],
            ],
        )
    }

    #[test]
    fn typed_columns_map_nulls_and_widened_sums() {
        let frame = sample();
        assert_eq!(
            frame.i64_column("total").expect("integers"),
            vec![Some(3), None, Some(4)]
        );
        assert_eq!(
            frame.f64_column("total").expect("floats"),
            vec![Some(3.0), None, Some(4.0)]
        );
        assert_eq!(frame.text_column("event_date").expect("text").len(), 3);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = sample().i64_column("note").expect_err("no such column");
        assert!(err.to_string().contains("note"));
    }

    #[test]
    fn empty_frame_keeps_labels() {
        let frame = Frame::empty(&["note_date", "note"]);
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
        assert_eq!(frame.column_index("note"), Some(1));
    }
}
