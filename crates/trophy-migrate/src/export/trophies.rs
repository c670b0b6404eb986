//! Trophy export.

use std::path::Path;

use async_trait::async_trait;

use super::context::{hand_off, ExportContext, Extractor};
use super::paths::trophy_image_path;
use crate::core::identifier::{Installation, LegacyTable};
use crate::core::kind::DataKind;
use crate::core::query::SelectQuery;
use crate::core::record::{Trophy, TrophyKind};
use crate::core::value::Row;
use crate::error::Result;

pub(crate) struct TrophyExtractor;

pub fn trophies_query(installation: Installation) -> SelectQuery {
    SelectQuery::from(installation.table(LegacyTable::Trophy))
        .columns([
            "trophyID",
            "title",
            "description",
            "categoryID",
            "isDisabled",
            "iconFile",
            "iconName",
            "iconColor",
            "badgeColor",
        ])
        .order_by(["trophyID"])
}

/// A trophy with an icon file is an image trophy, any other is a badge.
fn trophy_from_row(row: &Row, root: Option<&Path>) -> Result<Trophy> {
    let icon_file = row.text("iconFile")?;
    let kind = if icon_file.is_empty() {
        TrophyKind::Badge {
            icon_name: row.text("iconName")?,
            icon_color: row.text("iconColor")?,
            badge_color: row.text("badgeColor")?,
        }
    } else {
        TrophyKind::Image {
            file_location: trophy_image_path(root, &icon_file),
        }
    };

    Ok(Trophy {
        legacy_id: row.int("trophyID")?,
        title: row.text("title")?,
        description: row.text("description")?,
        category_legacy_id: row.int("categoryID")?,
        is_disabled: row.flag("isDisabled")?,
        kind,
    })
}

#[async_trait]
impl Extractor for TrophyExtractor {
    fn kind(&self) -> DataKind {
        DataKind::Trophy
    }

    async fn count(&self, ctx: &ExportContext) -> Result<i64> {
        ctx.db.count(&trophies_query(ctx.installation)).await
    }

    async fn export_batch(&self, ctx: &ExportContext, offset: u64, limit: u64) -> Result<usize> {
        let query = trophies_query(ctx.installation).page(offset, limit);
        let rows = ctx.db.select(&query).await?;
        let trophies = rows
            .iter()
            .map(|row| trophy_from_row(row, ctx.root.as_deref()))
            .collect::<Result<Vec<_>>>()?;

        hand_off(ctx, &trophies).await
    }
}
