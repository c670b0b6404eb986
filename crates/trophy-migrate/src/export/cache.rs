//! Run-scoped lookup caches.
//!
//! A [`RunCache`] lives for exactly one export run. Its tables are filled on
//! first use and never invalidated: the export assumes neither installation
//! changes its language list or object types while it runs.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::core::identifier::{Installation, LegacyTable};
use crate::core::query::SelectQuery;
use crate::core::traits::{LanguageProvider, LegacyDatabase};
use crate::error::{MigrateError, Result};

/// Lookup tables shared by the extractors of one run.
#[derive(Debug, Default)]
pub struct RunCache {
    /// Target language code -> target language ID.
    target_language_ids: OnceCell<HashMap<String, i64>>,

    /// Legacy language ID -> legacy language code.
    legacy_language_codes: OnceCell<HashMap<i64, String>>,

    /// (definition, object type) -> legacy object type ID.
    object_type_ids: Mutex<HashMap<(String, String), Option<i64>>>,
}

impl RunCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Target language IDs keyed by language code.
    pub async fn target_language_ids(
        &self,
        provider: &dyn LanguageProvider,
    ) -> Result<&HashMap<String, i64>> {
        self.target_language_ids
            .get_or_try_init(|| async {
                let languages = provider.languages().await?;
                debug!("Loaded {} target languages", languages.len());
                Ok::<_, MigrateError>(
                    languages
                        .into_iter()
                        .map(|language| (language.code, language.id))
                        .collect(),
                )
            })
            .await
    }

    /// Legacy language codes keyed by legacy language ID.
    pub async fn legacy_language_codes(
        &self,
        db: &dyn LegacyDatabase,
        installation: Installation,
    ) -> Result<&HashMap<i64, String>> {
        self.legacy_language_codes
            .get_or_try_init(|| async {
                let query = legacy_languages_query(installation);
                let rows = db.select(&query).await?;
                let mut codes = HashMap::with_capacity(rows.len());
                for row in rows {
                    codes.insert(row.int("languageID")?, row.text("languageCode")?);
                }
                debug!("Loaded {} legacy languages", codes.len());
                Ok::<_, MigrateError>(codes)
            })
            .await
    }

    /// Cached object type lookup; `None` if it was never resolved.
    pub fn object_type_id(&self, definition: &str, object_type: &str) -> Option<Option<i64>> {
        self.object_type_ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(definition.to_string(), object_type.to_string()))
            .copied()
    }

    /// Remember an object type lookup, including an unresolved one.
    pub fn store_object_type_id(&self, definition: &str, object_type: &str, id: Option<i64>) {
        self.object_type_ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((definition.to_string(), object_type.to_string()), id);
    }
}

/// All legacy languages.
pub fn legacy_languages_query(installation: Installation) -> SelectQuery {
    SelectQuery::from(installation.table(LegacyTable::Language))
        .columns(["languageID", "languageCode"])
        .order_by(["languageID"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{legacy_language_rows, CountingLanguages, MemoryDatabase};

    #[tokio::test]
    async fn test_target_languages_loaded_once() {
        let cache = RunCache::new();
        let provider = CountingLanguages::german_and_english();

        let ids = cache.target_language_ids(&provider).await.unwrap();
        assert_eq!(ids["de"], 1);
        assert_eq!(ids["en"], 2);
        cache.target_language_ids(&provider).await.unwrap();

        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_legacy_languages_loaded_once() {
        let db = MemoryDatabase::new().with_table("wcf1_language", legacy_language_rows());
        let cache = RunCache::new();

        let codes = cache
            .legacy_language_codes(&db, Installation::new(1))
            .await
            .unwrap();
        assert_eq!(codes[&10], "de");
        cache
            .legacy_language_codes(&db, Installation::new(1))
            .await
            .unwrap();

        assert_eq!(db.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let cache = RunCache::new();
        let empty = MemoryDatabase::new();
        assert!(cache
            .legacy_language_codes(&empty, Installation::new(1))
            .await
            .is_err());

        let db = MemoryDatabase::new().with_table("wcf1_language", legacy_language_rows());
        assert!(cache
            .legacy_language_codes(&db, Installation::new(1))
            .await
            .is_ok());
    }

    #[test]
    fn test_object_type_cache_remembers_absence() {
        let cache = RunCache::new();
        assert_eq!(cache.object_type_id("def", "type"), None);
        cache.store_object_type_id("def", "type", None);
        assert_eq!(cache.object_type_id("def", "type"), Some(None));
        cache.store_object_type_id("def", "other", Some(7));
        assert_eq!(cache.object_type_id("def", "other"), Some(Some(7)));
    }
}
