//! Shared state and the extractor seam.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::cache::RunCache;
use super::localization;
use crate::core::identifier::Installation;
use crate::core::kind::DataKind;
use crate::core::record::ImportRecord;
use crate::core::traits::{ImportHandler, LanguageProvider, LegacyDatabase};
use crate::error::Result;

/// Everything an extractor needs during one run.
pub struct ExportContext {
    pub(crate) db: Arc<dyn LegacyDatabase>,
    pub(crate) importer: Arc<dyn ImportHandler>,
    pub(crate) languages: Arc<dyn LanguageProvider>,
    pub(crate) cache: RunCache,
    pub(crate) installation: Installation,
    /// Effective installation root, after the nested directory fallback.
    pub(crate) root: Option<PathBuf>,
}

/// Counts and exports one data kind.
#[async_trait]
pub(crate) trait Extractor: Send + Sync {
    /// Kind this extractor produces.
    fn kind(&self) -> DataKind;

    /// Number of legacy rows this kind will export.
    async fn count(&self, ctx: &ExportContext) -> Result<i64>;

    /// Export one batch and return how many records were handed off.
    async fn export_batch(&self, ctx: &ExportContext, offset: u64, limit: u64) -> Result<usize>;
}

/// Resolve the placeholders of a batch and import every record.
///
/// Localization is looked up once per batch. Records are imported in the
/// order given.
pub(crate) async fn hand_off<R>(ctx: &ExportContext, records: &[R]) -> Result<usize>
where
    R: ImportRecord + Send + Sync,
{
    let keys: BTreeSet<String> = records
        .iter()
        .flat_map(|record| record.placeholders())
        .map(|placeholder| placeholder.key)
        .collect();
    let resolved = localization::resolve(ctx, &keys).await?;

    for record in records {
        ctx.importer
            .import(
                R::KIND.name(),
                record.legacy_id(),
                record.fields(),
                record.additional_data(&resolved),
            )
            .await?;
    }

    debug!(
        "{}: handed off {} records ({} localized keys)",
        R::KIND,
        records.len(),
        resolved.len()
    );
    Ok(records.len())
}
