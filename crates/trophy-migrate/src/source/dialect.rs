//! MySQL rendering of [`SelectQuery`].

use crate::core::identifier::quote_mysql;
use crate::core::query::{Condition, SelectQuery};
use crate::error::Result;

/// SQL syntax for MySQL/MariaDB.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Placeholder for bound parameters.
    pub fn param_placeholder(&self) -> &'static str {
        "?"
    }

    /// Render a SELECT with WHERE, ORDER BY and LIMIT/OFFSET.
    pub fn build_select_query(&self, query: &SelectQuery) -> Result<String> {
        let columns = if query.columns.is_empty() {
            "*".to_string()
        } else {
            query
                .columns
                .iter()
                .map(|c| quote_mysql(c))
                .collect::<Result<Vec<_>>>()?
                .join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", columns, quote_mysql(&query.table)?);
        sql.push_str(&self.build_where(&query.conditions)?);

        if !query.order_by.is_empty() {
            let order = query
                .order_by
                .iter()
                .map(|c| quote_mysql(c))
                .collect::<Result<Vec<_>>>()?
                .join(", ");
            sql.push_str(&format!(" ORDER BY {}", order));
        }

        match query.limit {
            Some(limit) => sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, query.offset)),
            // MySQL has no OFFSET without LIMIT
            None if query.offset > 0 => {
                sql.push_str(&format!(" LIMIT 18446744073709551615 OFFSET {}", query.offset))
            }
            None => {}
        }

        Ok(sql)
    }

    /// Render a COUNT(*) over the query's table and conditions.
    pub fn build_count_query(&self, query: &SelectQuery) -> Result<String> {
        Ok(format!(
            "SELECT COUNT(*) AS cnt FROM {}{}",
            quote_mysql(&query.table)?,
            self.build_where(&query.conditions)?
        ))
    }

    fn build_where(&self, conditions: &[Condition]) -> Result<String> {
        if conditions.is_empty() {
            return Ok(String::new());
        }

        let clauses = conditions
            .iter()
            .map(|condition| match condition {
                Condition::Eq(column, _) => Ok(format!(
                    "{} = {}",
                    quote_mysql(column)?,
                    self.param_placeholder()
                )),
                Condition::In(_, values) if values.is_empty() => Ok("1 = 0".to_string()),
                Condition::In(column, values) => Ok(format!(
                    "{} IN ({})",
                    quote_mysql(column)?,
                    vec![self.param_placeholder(); values.len()].join(", ")
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(format!(" WHERE {}", clauses.join(" AND ")))
    }
}
