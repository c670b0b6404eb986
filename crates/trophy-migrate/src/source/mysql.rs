//! MySQL/MariaDB legacy database.
//!
//! Implements [`LegacyDatabase`] on top of an SQLx connection pool.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{
    MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlSslMode,
};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row as _, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::core::query::SelectQuery;
use crate::core::traits::LegacyDatabase;
use crate::core::value::{Row, SqlValue};
use crate::error::{MigrateError, Result};

use super::dialect::MysqlDialect;

/// Connection pool timeout.
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Legacy database backed by MySQL/MariaDB.
pub struct MysqlSource {
    pool: MySqlPool,
    dialect: MysqlDialect,
}

impl MysqlSource {
    /// Connect using the source configuration.
    pub async fn new(config: &SourceConfig) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password)
            .ssl_mode(MySqlSslMode::Preferred);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(POOL_CONNECTION_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| MigrateError::query(e, "creating MySQL source pool"))?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| MigrateError::query(e, "testing MySQL source connection"))?;

        info!(
            "Connected to MySQL source: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(Self {
            pool,
            dialect: MysqlDialect,
        })
    }

    fn bind_parameters<'q>(
        sql: &'q str,
        query: &'q SelectQuery,
    ) -> Query<'q, MySql, MySqlArguments> {
        query
            .parameters()
            .into_iter()
            .fold(sqlx::query(sql), |q, value| match value {
                SqlValue::Null => q.bind(None::<i64>),
                SqlValue::Int(v) => q.bind(*v),
                SqlValue::Text(s) => q.bind(s.as_str()),
            })
    }

    /// Convert a MySQL row into a name-keyed [`Row`].
    fn convert_row(table: &str, row: &MySqlRow) -> Row {
        let mut converted = Row::new(table);
        for column in row.columns() {
            let idx = column.ordinal();
            converted.insert(column.name(), Self::convert_value(row, idx));
        }
        converted
    }

    /// Convert one column, based on its reported type name.
    fn convert_value(row: &MySqlRow, idx: usize) -> SqlValue {
        let type_name = match row.try_get_raw(idx) {
            Ok(raw) if raw.is_null() => return SqlValue::Null,
            Ok(raw) => raw.type_info().name().to_ascii_uppercase(),
            Err(_) => return SqlValue::Null,
        };

        match type_name.as_str() {
            "BOOLEAN" => row
                .try_get::<bool, _>(idx)
                .map(|v| SqlValue::Int(i64::from(v)))
                .unwrap_or(SqlValue::Null),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
                .try_get::<i64, _>(idx)
                .map(SqlValue::Int)
                .unwrap_or(SqlValue::Null),
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
            | "BIGINT UNSIGNED" => row
                .try_get::<u64, _>(idx)
                .ok()
                .and_then(|v| i64::try_from(v).ok())
                .map(SqlValue::Int)
                .unwrap_or(SqlValue::Null),
            "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
                .try_get::<Vec<u8>, _>(idx)
                .map(|b| SqlValue::Text(String::from_utf8_lossy(&b).into_owned()))
                .unwrap_or(SqlValue::Null),
            // CHAR, VARCHAR, TEXT variants, ENUM, SET and anything else
            _ => row
                .try_get::<String, _>(idx)
                .map(SqlValue::Text)
                .unwrap_or(SqlValue::Null),
        }
    }
}

#[async_trait]
impl LegacyDatabase for MysqlSource {
    async fn count(&self, query: &SelectQuery) -> Result<i64> {
        let sql = self.dialect.build_count_query(query)?;
        debug!("{}", sql);

        let row: MySqlRow = Self::bind_parameters(&sql, query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MigrateError::query(e, format!("counting rows of {}", query.table)))?;

        row.try_get::<i64, _>("cnt")
            .map_err(|e| MigrateError::query(e, format!("reading row count of {}", query.table)))
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        let sql = self.dialect.build_select_query(query)?;
        debug!("{}", sql);

        let rows: Vec<MySqlRow> = Self::bind_parameters(&sql, query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MigrateError::query(e, format!("selecting from {}", query.table)))?;

        Ok(rows
            .iter()
            .map(|row| Self::convert_row(&query.table, row))
            .collect())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
