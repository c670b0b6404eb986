//! Localization placeholder resolution.
//!
//! Legacy language items are keyed by the legacy language ID. They are mapped
//! to target language IDs by language code; items in a language the target
//! installation does not have are dropped.

use std::collections::BTreeSet;

use tracing::debug;

use super::context::ExportContext;
use crate::core::identifier::{Installation, LegacyTable};
use crate::core::query::SelectQuery;
use crate::core::record::LocalizationMap;
use crate::error::Result;

/// Language items for the given keys, in all legacy languages.
pub fn language_items_query(installation: Installation, keys: &BTreeSet<String>) -> SelectQuery {
    SelectQuery::from(installation.table(LegacyTable::LanguageItem))
        .columns(["languageItem", "languageItemValue", "languageID"])
        .filter_in("languageItem", keys.iter().map(String::as_str))
        .order_by(["languageItem", "languageID"])
}

/// Resolve localization keys to their values per target language ID.
///
/// Keys without any value in a target language are absent from the result.
pub async fn resolve(ctx: &ExportContext, keys: &BTreeSet<String>) -> Result<LocalizationMap> {
    let mut resolved = LocalizationMap::new();
    if keys.is_empty() {
        return Ok(resolved);
    }

    let target_ids = ctx.cache.target_language_ids(ctx.languages.as_ref()).await?;
    let legacy_codes = ctx
        .cache
        .legacy_language_codes(ctx.db.as_ref(), ctx.installation)
        .await?;

    let rows = ctx
        .db
        .select(&language_items_query(ctx.installation, keys))
        .await?;

    for row in rows {
        let language_id = row.int("languageID")?;
        let Some(target_id) = legacy_codes
            .get(&language_id)
            .and_then(|code| target_ids.get(code))
        else {
            continue;
        };

        resolved
            .entry(row.text("languageItem")?)
            .or_default()
            .insert(*target_id, row.text("languageItemValue")?);
    }

    debug!("Resolved {} of {} localization keys", resolved.len(), keys.len());
    Ok(resolved)
}
