//! Trophy category export.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use super::context::{hand_off, ExportContext, Extractor};
use super::object_type::{resolve_object_type_id, CATEGORY_DEFINITION, TROPHY_CATEGORY_OBJECT_TYPE};
use crate::core::identifier::{Installation, LegacyTable};
use crate::core::kind::DataKind;
use crate::core::query::SelectQuery;
use crate::core::record::TrophyCategory;
use crate::core::value::Row;
use crate::error::Result;

pub(crate) struct CategoryExtractor;

/// Categories of one object type, parents ordered before their children.
pub fn categories_query(installation: Installation, object_type_id: i64) -> SelectQuery {
    SelectQuery::from(installation.table(LegacyTable::Category))
        .columns([
            "categoryID",
            "parentCategoryID",
            "title",
            "description",
            "showOrder",
            "time",
            "isDisabled",
        ])
        .filter_eq("objectTypeID", object_type_id)
        .order_by(["parentCategoryID", "categoryID"])
}

fn category_from_row(row: &Row) -> Result<TrophyCategory> {
    Ok(TrophyCategory {
        legacy_id: row.int("categoryID")?,
        parent_legacy_id: row.int("parentCategoryID")?,
        title: row.text("title")?,
        description: row.text("description")?,
        show_order: row.int("showOrder")?,
        time: row.int("time")?,
        is_disabled: row.flag("isDisabled")?,
    })
}

/// Reorder a batch so every category follows its parent.
///
/// Sorting by parent ID alone is not enough: a child may have a lower parent
/// ID than its parent. The first-seen order is kept otherwise. Parents
/// outside the batch and cycles are ignored.
pub(crate) fn order_parents_first(categories: Vec<TrophyCategory>) -> Vec<TrophyCategory> {
    let index: HashMap<i64, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, category)| (category.legacy_id, i))
        .collect();

    let mut emitted = vec![false; categories.len()];
    let mut order = Vec::with_capacity(categories.len());

    for start in 0..categories.len() {
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            if emitted[i] || chain.contains(&i) {
                break;
            }
            chain.push(i);
            current = index.get(&categories[i].parent_legacy_id).copied();
        }
        for &i in chain.iter().rev() {
            emitted[i] = true;
            order.push(i);
        }
    }

    let mut slots: Vec<Option<TrophyCategory>> = categories.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

#[async_trait]
impl Extractor for CategoryExtractor {
    fn kind(&self) -> DataKind {
        DataKind::TrophyCategory
    }

    async fn count(&self, ctx: &ExportContext) -> Result<i64> {
        match resolve_object_type_id(ctx, CATEGORY_DEFINITION, TROPHY_CATEGORY_OBJECT_TYPE).await? {
            Some(object_type_id) => {
                ctx.db
                    .count(&categories_query(ctx.installation, object_type_id))
                    .await
            }
            None => Ok(0),
        }
    }

    async fn export_batch(&self, ctx: &ExportContext, offset: u64, limit: u64) -> Result<usize> {
        let Some(object_type_id) =
            resolve_object_type_id(ctx, CATEGORY_DEFINITION, TROPHY_CATEGORY_OBJECT_TYPE).await?
        else {
            warn!("Trophy category object type is not installed, no categories exported");
            return Ok(0);
        };

        let query = categories_query(ctx.installation, object_type_id).page(offset, limit);
        let rows = ctx.db.select(&query).await?;
        let categories = rows
            .iter()
            .map(category_from_row)
            .collect::<Result<Vec<_>>>()?;

        hand_off(ctx, &order_parents_first(categories)).await
    }
}
