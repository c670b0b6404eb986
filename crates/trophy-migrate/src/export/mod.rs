//! Trophy data export from a legacy installation.
//!
//! The [`Exporter`] reads one data kind at a time in batches, normalizes the
//! rows into records and hands them to an [`ImportHandler`]. It owns no
//! target-side state; ID mapping and deduplication are up to the handler.

mod cache;
mod categories;
mod context;
mod fake_users;
mod localization;
mod object_type;
mod paths;
mod queue;
mod trophies;
mod user_trophies;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::identifier::{Installation, LegacyTable, DEFAULT_TABLE_PREFIX};
use crate::core::kind::DataKind;
use crate::core::query::SelectQuery;
use crate::core::traits::{ImportHandler, LanguageProvider, LegacyDatabase};
use crate::error::Result;

use cache::RunCache;
use categories::CategoryExtractor;
use context::{ExportContext, Extractor};
use fake_users::FakeUserExtractor;
use trophies::TrophyExtractor;
use user_trophies::UserTrophyExtractor;

pub use object_type::{CATEGORY_DEFINITION, TROPHY_CATEGORY_OBJECT_TYPE};
pub use paths::{has_install_marker, resolve_install_root, MARKER_FILE};
pub use queue::{build_queue, supported_data};

/// Exporter settings of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Table prefix of the legacy installation, e.g. `wcf1_`.
    pub database_prefix: String,
    /// Root directory of the legacy installation.
    pub file_system_path: Option<PathBuf>,
    /// Kinds chosen for export.
    pub selected_data: BTreeSet<DataKind>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            database_prefix: DEFAULT_TABLE_PREFIX.to_string(),
            file_system_path: None,
            selected_data: DataKind::ALL.into_iter().collect(),
        }
    }
}

/// Exports trophy data from one legacy installation.
pub struct Exporter {
    ctx: ExportContext,
    selected_data: BTreeSet<DataKind>,
}

impl Exporter {
    /// Create an exporter.
    ///
    /// The installation number is taken from the table prefix. An empty file
    /// system path counts as unset; a path whose framework lives in the
    /// nested `wcf/` directory is replaced by that directory.
    pub fn new(
        db: Arc<dyn LegacyDatabase>,
        importer: Arc<dyn ImportHandler>,
        languages: Arc<dyn LanguageProvider>,
        settings: ExportSettings,
    ) -> Self {
        let installation = Installation::from_prefix(&settings.database_prefix);
        let root = settings
            .file_system_path
            .filter(|path| !path.as_os_str().is_empty())
            .map(|path| resolve_install_root(&path));

        debug!(
            "Exporter for {} (root: {:?}, {} kinds selected)",
            installation,
            root,
            settings.selected_data.len()
        );

        Self {
            ctx: ExportContext {
                db,
                importer,
                languages,
                cache: RunCache::new(),
                installation,
                root,
            },
            selected_data: settings.selected_data,
        }
    }

    /// Table prefix of a default installation.
    pub fn default_database_prefix() -> &'static str {
        DEFAULT_TABLE_PREFIX
    }

    /// Exportable kinds and their sub-kinds.
    pub fn supported_data() -> Vec<(DataKind, Vec<DataKind>)> {
        supported_data()
    }

    /// Rows per batch for `kind`; `None` exports all rows at once.
    pub fn limit(kind: DataKind) -> Option<u64> {
        kind.page_size()
    }

    /// Installation number read from the table prefix.
    pub fn installation(&self) -> Installation {
        self.ctx.installation
    }

    /// Effective installation root.
    pub fn file_system_path(&self) -> Option<&Path> {
        self.ctx.root.as_deref()
    }

    pub fn selected_data(&self) -> &BTreeSet<DataKind> {
        &self.selected_data
    }

    /// Selected kinds in export order.
    pub fn queue(&self) -> Vec<DataKind> {
        build_queue(&self.selected_data)
    }

    /// Check that the trophy table of the installation can be read.
    pub async fn validate_database_access(&self) -> Result<()> {
        let query = SelectQuery::from(self.ctx.installation.table(LegacyTable::Trophy));
        let trophies = self.ctx.db.count(&query).await?;
        info!(
            "{} database access ok ({} trophies)",
            self.ctx.installation, trophies
        );
        Ok(())
    }

    /// Check the installation root when trophies are selected.
    ///
    /// Image trophies reference files below the root, so it must be set and
    /// contain the framework either directly or in its `wcf/` directory.
    pub fn validate_file_access(&self) -> bool {
        if !self.selected_data.contains(&DataKind::Trophy) {
            return true;
        }

        match &self.ctx.root {
            Some(root) if has_install_marker(root) => true,
            Some(root) => {
                warn!("{} not found below {}", MARKER_FILE, root.display());
                false
            }
            None => {
                warn!("No file system path configured, trophy images cannot be located");
                false
            }
        }
    }

    /// Number of legacy rows `kind` will export.
    pub async fn count(&self, kind: DataKind) -> Result<i64> {
        extractor(kind).count(&self.ctx).await
    }

    /// Export one batch of `kind` and return the number of records handed off.
    pub async fn export(&self, kind: DataKind, offset: u64, limit: u64) -> Result<usize> {
        let extractor = extractor(kind);
        debug!(
            "{}: exporting batch offset={} limit={}",
            extractor.kind(),
            offset,
            limit
        );
        extractor.export_batch(&self.ctx, offset, limit).await
    }

    pub async fn count_trophy_categories(&self) -> Result<i64> {
        self.count(DataKind::TrophyCategory).await
    }

    pub async fn export_trophy_categories(&self, offset: u64, limit: u64) -> Result<usize> {
        self.export(DataKind::TrophyCategory, offset, limit).await
    }

    pub async fn count_trophies(&self) -> Result<i64> {
        self.count(DataKind::Trophy).await
    }

    pub async fn export_trophies(&self, offset: u64, limit: u64) -> Result<usize> {
        self.export(DataKind::Trophy, offset, limit).await
    }

    pub async fn count_user_trophies(&self) -> Result<i64> {
        self.count(DataKind::UserTrophy).await
    }

    pub async fn export_user_trophies(&self, offset: u64, limit: u64) -> Result<usize> {
        self.export(DataKind::UserTrophy, offset, limit).await
    }

    pub async fn count_fake_users(&self) -> Result<i64> {
        self.count(DataKind::UserFakeImport).await
    }

    pub async fn export_fake_users(&self, offset: u64, limit: u64) -> Result<usize> {
        self.export(DataKind::UserFakeImport, offset, limit).await
    }

    /// Flush the import handler.
    pub async fn finish(&self) -> Result<()> {
        self.ctx.importer.finish().await
    }

    /// Close the legacy database connection.
    pub async fn close(&self) {
        self.ctx.db.close().await;
    }
}

fn extractor(kind: DataKind) -> &'static dyn Extractor {
    match kind {
        DataKind::TrophyCategory => &CategoryExtractor,
        DataKind::UserFakeImport => &FakeUserExtractor,
        DataKind::Trophy => &TrophyExtractor,
        DataKind::UserTrophy => &UserTrophyExtractor,
    }
}
