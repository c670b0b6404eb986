//! SQL values and rows read from the legacy database.
//!
//! The legacy schema only uses integer and text columns for the tables this
//! crate reads, so the value model is deliberately small. Accessors are lenient
//! in the same way the legacy platform is: a NULL integer reads as `0` and a
//! NULL text column reads as an empty string.

use std::collections::HashMap;
use std::fmt;

use crate::error::{MigrateError, Result};

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,

    /// Any integer column (signed or unsigned, tinyint through bigint).
    Int(i64),

    /// Any character column.
    Text(String),
}

impl SqlValue {
    /// Interpret the value as an integer.
    ///
    /// Numeric text is parsed; NULL reads as `Some(0)`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Null => Some(0),
            SqlValue::Int(v) => Some(*v),
            SqlValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the value as text. Integers are formatted, NULL is empty.
    pub fn to_text(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Int(v) => v.to_string(),
            SqlValue::Text(s) => s.clone(),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v.into())
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// A row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    table: String,
    values: HashMap<String, SqlValue>,
}

impl Row {
    /// Create an empty row read from `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: HashMap::new(),
        }
    }

    /// Builder-style column insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        self.values.insert(column.into(), value.into());
    }

    /// Raw access to a column.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.values.get(column)
    }

    /// Read an integer column. A missing column is a schema error.
    pub fn int(&self, column: &str) -> Result<i64> {
        let value = self.require(column)?;
        value.as_i64().ok_or_else(|| {
            MigrateError::schema(
                &self.table,
                format!("column {} holds non-integer value {}", column, value),
            )
        })
    }

    /// Read a text column. A missing column is a schema error.
    pub fn text(&self, column: &str) -> Result<String> {
        Ok(self.require(column)?.to_text())
    }

    /// Read a boolean flag column (non-zero is true).
    pub fn flag(&self, column: &str) -> Result<bool> {
        Ok(self.int(column)? != 0)
    }

    fn require(&self, column: &str) -> Result<&SqlValue> {
        self.values
            .get(column)
            .ok_or_else(|| MigrateError::schema(&self.table, format!("missing column {}", column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_reads_as_zero_and_empty() {
        let row = Row::new("wcf1_trophy")
            .with("categoryID", SqlValue::Null)
            .with("iconFile", SqlValue::Null);
        assert_eq!(row.int("categoryID").unwrap(), 0);
        assert_eq!(row.text("iconFile").unwrap(), "");
    }

    #[test]
    fn test_numeric_text_parses() {
        let row = Row::new("wcf1_user").with("userID", "42");
        assert_eq!(row.int("userID").unwrap(), 42);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let row = Row::new("wcf1_trophy");
        let err = row.int("trophyID").unwrap_err();
        assert!(matches!(err, MigrateError::Schema { .. }));
        assert!(err.to_string().contains("wcf1_trophy"));
    }

    #[test]
    fn test_non_integer_text_is_schema_error() {
        let row = Row::new("wcf1_trophy").with("isDisabled", "yes");
        assert!(row.int("isDisabled").is_err());
    }

    #[test]
    fn test_flag() {
        let row = Row::new("wcf1_user_trophy")
            .with("useTrophyDescription", 1)
            .with("other", 0);
        assert!(row.flag("useTrophyDescription").unwrap());
        assert!(!row.flag("other").unwrap());
    }
}
