//! Legacy user ID registration.
//!
//! Users are not migrated by this exporter. The target platform shares its
//! user table with the legacy installation, so each legacy user ID is
//! registered as mapping to itself so awards can reference it.

use async_trait::async_trait;
use tracing::debug;

use super::context::{ExportContext, Extractor};
use crate::core::identifier::{Installation, LegacyTable};
use crate::core::kind::{DataKind, USER_KIND};
use crate::core::query::SelectQuery;
use crate::error::Result;

pub(crate) struct FakeUserExtractor;

pub fn users_query(installation: Installation) -> SelectQuery {
    SelectQuery::from(installation.table(LegacyTable::User))
        .columns(["userID"])
        .order_by(["userID"])
}

#[async_trait]
impl Extractor for FakeUserExtractor {
    fn kind(&self) -> DataKind {
        DataKind::UserFakeImport
    }

    async fn count(&self, ctx: &ExportContext) -> Result<i64> {
        ctx.db.count(&users_query(ctx.installation)).await
    }

    async fn export_batch(&self, ctx: &ExportContext, offset: u64, limit: u64) -> Result<usize> {
        let query = users_query(ctx.installation).page(offset, limit);
        let rows = ctx.db.select(&query).await?;

        let mut registered = 0;
        for row in &rows {
            // NULL reads as 0, which is never a valid user ID
            let user_id = row.int("userID")?;
            if user_id == 0 {
                continue;
            }
            ctx.importer.save_new_id(USER_KIND, user_id, user_id).await?;
            registered += 1;
        }

        debug!("{}: registered {} user IDs", self.kind(), registered);
        Ok(registered)
    }
}
