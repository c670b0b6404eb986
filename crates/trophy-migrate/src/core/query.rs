//! Structured SELECT queries against legacy tables.
//!
//! The exporter never writes SQL text itself. Extractors describe what they
//! need as a [`SelectQuery`] and a [`LegacyDatabase`](super::LegacyDatabase)
//! implementation renders it for its engine (see
//! [`MysqlDialect`](crate::source::MysqlDialect)).

use super::value::SqlValue;

/// A WHERE condition. Conditions of one query are joined with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column = value`
    Eq(String, SqlValue),
    /// `column IN (values...)`; an empty list matches nothing.
    In(String, Vec<SqlValue>),
}

impl Condition {
    /// Column the condition applies to.
    pub fn column(&self) -> &str {
        match self {
            Condition::Eq(column, _) | Condition::In(column, _) => column,
        }
    }
}

/// A single-table SELECT with optional paging.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Fully prefixed table name.
    pub table: String,
    /// Columns to select; empty selects all columns.
    pub columns: Vec<String>,
    /// WHERE conditions.
    pub conditions: Vec<Condition>,
    /// ORDER BY columns, ascending.
    pub order_by: Vec<String>,
    /// Row limit; `None` returns every matching row.
    pub limit: Option<u64>,
    /// Rows to skip.
    pub offset: u64,
}

impl SelectQuery {
    /// Start a query selecting all columns of `table`.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: 0,
        }
    }

    /// Restrict the selected columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add `column = value`.
    pub fn filter_eq(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.conditions
            .push(Condition::Eq(column.into(), value.into()));
        self
    }

    /// Add `column IN (values...)`.
    pub fn filter_in<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.conditions.push(Condition::In(
            column.into(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Set the ORDER BY columns.
    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Fetch one page of `limit` rows starting at `offset`.
    pub fn page(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    /// Limit without offset.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Bound parameters in rendering order.
    pub fn parameters(&self) -> Vec<&SqlValue> {
        self.conditions
            .iter()
            .flat_map(|condition| match condition {
                Condition::Eq(_, value) => vec![value],
                Condition::In(_, values) => values.iter().collect(),
            })
            .collect()
    }
}
