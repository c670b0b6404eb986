//! User trophy export.

use async_trait::async_trait;

use super::context::{hand_off, ExportContext, Extractor};
use crate::core::identifier::{Installation, LegacyTable};
use crate::core::kind::DataKind;
use crate::core::query::SelectQuery;
use crate::core::record::UserTrophyAward;
use crate::core::value::Row;
use crate::error::Result;

pub(crate) struct UserTrophyExtractor;

pub fn user_trophies_query(installation: Installation) -> SelectQuery {
    SelectQuery::from(installation.table(LegacyTable::UserTrophy))
        .columns([
            "userTrophyID",
            "trophyID",
            "userID",
            "time",
            "useTrophyDescription",
            "description",
        ])
        .order_by(["userTrophyID"])
}

fn award_from_row(row: &Row) -> Result<UserTrophyAward> {
    Ok(UserTrophyAward::new(
        row.int("userTrophyID")?,
        row.int("trophyID")?,
        row.int("userID")?,
        row.int("time")?,
        row.flag("useTrophyDescription")?,
        row.text("description")?,
    ))
}

#[async_trait]
impl Extractor for UserTrophyExtractor {
    fn kind(&self) -> DataKind {
        DataKind::UserTrophy
    }

    async fn count(&self, ctx: &ExportContext) -> Result<i64> {
        ctx.db.count(&user_trophies_query(ctx.installation)).await
    }

    async fn export_batch(&self, ctx: &ExportContext, offset: u64, limit: u64) -> Result<usize> {
        let query = user_trophies_query(ctx.installation).page(offset, limit);
        let rows = ctx.db.select(&query).await?;
        let awards = rows
            .iter()
            .map(award_from_row)
            .collect::<Result<Vec<_>>>()?;

        hand_off(ctx, &awards).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        exporter, language_item, legacy_language_rows, user_trophy_row, MemoryDatabase,
        RecordingImporter,
    };
    use std::sync::Arc;

    fn database() -> MemoryDatabase {
        MemoryDatabase::new()
            .with_table("wcf1_language", legacy_language_rows())
            .with_table(
                "wcf1_language_item",
                vec![
                    language_item("wcf.user.trophy.userTrophy.description2", "Für Mut", 10),
                    language_item("wcf.user.trophy.userTrophy.description3", "Ignored", 10),
                ],
            )
            .with_table(
                "wcf1_user_trophy",
                vec![
                    user_trophy_row(3, 1, 7, true, "wcf.user.trophy.userTrophy.description3"),
                    user_trophy_row(1, 1, 5, false, "Well done"),
                    user_trophy_row(2, 2, 5, false, "wcf.user.trophy.userTrophy.description2"),
                ],
            )
    }

    #[tokio::test]
    async fn test_award_fields() {
        let db = Arc::new(database());
        let importer = Arc::new(RecordingImporter::new());
        let exporter = exporter(db, importer.clone(), &[DataKind::Trophy, DataKind::UserTrophy]);

        assert_eq!(exporter.count_user_trophies().await.unwrap(), 3);
        assert_eq!(exporter.export_user_trophies(0, 100).await.unwrap(), 3);
        assert_eq!(importer.imported_ids(DataKind::UserTrophy), vec![1, 2, 3]);

        let (fields, data) = importer.imported(DataKind::UserTrophy, 1).unwrap();
        assert_eq!(fields["trophyID"], 1);
        assert_eq!(fields["userID"], 5);
        assert_eq!(fields["time"], 1_500_000_001);
        assert_eq!(fields["useCustomDescription"], 1);
        assert_eq!(fields["description"], "Well done");
        assert!(data.i18n.is_empty());
    }

    #[tokio::test]
    async fn test_custom_description_is_localized() {
        let db = Arc::new(database());
        let importer = Arc::new(RecordingImporter::new());
        let exporter = exporter(db, importer.clone(), &[DataKind::Trophy, DataKind::UserTrophy]);

        exporter.export_user_trophies(0, 100).await.unwrap();

        let (_, data) = importer.imported(DataKind::UserTrophy, 2).unwrap();
        assert_eq!(data.i18n["description"][&1_i64], "Für Mut");
    }

    #[tokio::test]
    async fn test_trophy_description_drops_custom_text() {
        let db = Arc::new(database());
        let importer = Arc::new(RecordingImporter::new());
        let exporter = exporter(db, importer.clone(), &[DataKind::Trophy, DataKind::UserTrophy]);

        exporter.export_user_trophies(0, 100).await.unwrap();

        let (fields, data) = importer.imported(DataKind::UserTrophy, 3).unwrap();
        assert_eq!(fields["useCustomDescription"], 0);
        assert_eq!(fields["description"], "");
        assert!(data.i18n.is_empty());
    }
}
