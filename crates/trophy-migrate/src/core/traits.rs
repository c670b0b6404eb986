//! Boundary traits of the export pipeline.
//!
//! - [`LegacyDatabase`]: read access to the legacy installation's tables
//! - [`ImportHandler`]: receives transformed records and owns ID mapping
//! - [`LanguageProvider`]: lists the languages of the target installation
//!
//! The pipeline itself only depends on these traits, so each of them can be
//! backed by a real driver in production and by an in-memory fake in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

use super::query::SelectQuery;
use super::record::AdditionalData;
use super::value::Row;

/// Read access to the legacy database.
///
/// Errors are never swallowed by the pipeline; they abort the current run.
#[async_trait]
pub trait LegacyDatabase: Send + Sync {
    /// Count the rows matching the query. Ordering and paging are ignored.
    async fn count(&self, query: &SelectQuery) -> Result<i64>;

    /// Fetch the rows matching the query.
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>>;

    /// Close the connection pool.
    async fn close(&self);
}

/// Receives transformed records and performs the writes into the target.
///
/// Implementations must be idempotent per `(kind, legacy_id)` pair.
#[async_trait]
pub trait ImportHandler: Send + Sync {
    /// Import one record under its legacy ID.
    async fn import(
        &self,
        kind: &str,
        legacy_id: i64,
        fields: Value,
        additional_data: AdditionalData,
    ) -> Result<()>;

    /// Register that `legacy_id` of `kind` maps to `new_id` in the target.
    async fn save_new_id(&self, kind: &str, legacy_id: i64, new_id: i64) -> Result<()>;

    /// Flush buffered writes.
    async fn finish(&self) -> Result<()> {
        Ok(())
    }
}

/// A language configured in the target installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLanguage {
    /// Language code, e.g. `de`.
    pub code: String,
    /// Numeric language ID in the target installation.
    pub id: i64,
}

/// Lists the languages of the target installation.
#[async_trait]
pub trait LanguageProvider: Send + Sync {
    /// All configured languages.
    async fn languages(&self) -> Result<Vec<TargetLanguage>>;
}
