//! In-memory fakes shared by the unit tests.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::core::query::{Condition, SelectQuery};
use crate::core::record::AdditionalData;
use crate::core::traits::{ImportHandler, LanguageProvider, LegacyDatabase, TargetLanguage};
use crate::core::value::{Row, SqlValue};
use crate::core::DataKind;
use crate::error::{MigrateError, Result};
use crate::export::{ExportSettings, Exporter};
use crate::import::StaticLanguages;

/// Legacy database backed by in-memory tables.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: HashMap<String, Vec<Row>>,
    queries: Mutex<Vec<SelectQuery>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, rows: Vec<Row>) -> Self {
        self.tables.insert(name.to_string(), rows);
        self
    }

    /// Every query executed so far, counts included.
    pub fn queries(&self) -> Vec<SelectQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Executed queries against one table.
    pub fn queries_on(&self, table: &str) -> Vec<SelectQuery> {
        self.queries()
            .into_iter()
            .filter(|query| query.table == table)
            .collect()
    }

    fn matching(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        self.queries.lock().unwrap().push(query.clone());

        let rows = self.tables.get(&query.table).ok_or_else(|| {
            MigrateError::query(
                format!("Table '{}' doesn't exist", query.table),
                "memory database",
            )
        })?;

        Ok(rows
            .iter()
            .filter(|row| query.conditions.iter().all(|c| matches(row, c)))
            .cloned()
            .collect())
    }
}

fn matches(row: &Row, condition: &Condition) -> bool {
    match condition {
        Condition::Eq(column, value) => row.get(column).is_some_and(|v| same_value(v, value)),
        Condition::In(column, values) => row
            .get(column)
            .is_some_and(|v| values.iter().any(|value| same_value(v, value))),
    }
}

fn same_value(a: &SqlValue, b: &SqlValue) -> bool {
    match (a, b) {
        (SqlValue::Int(x), SqlValue::Int(y)) => x == y,
        _ => a.to_text() == b.to_text(),
    }
}

fn compare_values(a: Option<&SqlValue>, b: Option<&SqlValue>) -> Ordering {
    match (a, b) {
        (Some(SqlValue::Int(x)), Some(SqlValue::Int(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_text().cmp(&y.to_text()),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

#[async_trait]
impl LegacyDatabase for MemoryDatabase {
    async fn count(&self, query: &SelectQuery) -> Result<i64> {
        Ok(self.matching(query)?.len() as i64)
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        let mut rows = self.matching(query)?;
        rows.sort_by(|a, b| {
            query
                .order_by
                .iter()
                .map(|column| compare_values(a.get(column), b.get(column)))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let offset = query.offset as usize;
        let limit = query.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn close(&self) {}
}

/// One call received by [`RecordingImporter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Handoff {
    Import {
        kind: String,
        legacy_id: i64,
        fields: Value,
        additional_data: AdditionalData,
    },
    SaveNewId {
        kind: String,
        legacy_id: i64,
        new_id: i64,
    },
}

/// Import handler that records every call.
#[derive(Debug, Default)]
pub struct RecordingImporter {
    handoffs: Mutex<Vec<Handoff>>,
    finished: AtomicUsize,
    fail_on: Option<i64>,
}

impl RecordingImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the import of this legacy ID.
    pub fn failing_on(legacy_id: i64) -> Self {
        Self {
            fail_on: Some(legacy_id),
            ..Self::default()
        }
    }

    pub fn handoffs(&self) -> Vec<Handoff> {
        self.handoffs.lock().unwrap().clone()
    }

    /// Legacy IDs imported under `kind`, in call order.
    pub fn imported_ids(&self, kind: DataKind) -> Vec<i64> {
        self.handoffs()
            .into_iter()
            .filter_map(|handoff| match handoff {
                Handoff::Import {
                    kind: k, legacy_id, ..
                } if k == kind.name() => Some(legacy_id),
                _ => None,
            })
            .collect()
    }

    /// Fields and additional data of one imported record.
    pub fn imported(&self, kind: DataKind, id: i64) -> Option<(Value, AdditionalData)> {
        self.handoffs().into_iter().find_map(|handoff| match handoff {
            Handoff::Import {
                kind: k,
                legacy_id,
                fields,
                additional_data,
            } if k == kind.name() && legacy_id == id => Some((fields, additional_data)),
            _ => None,
        })
    }

    /// Saved ID mappings as `(kind, legacy_id, new_id)`.
    pub fn saved_ids(&self) -> Vec<(String, i64, i64)> {
        self.handoffs()
            .into_iter()
            .filter_map(|handoff| match handoff {
                Handoff::SaveNewId {
                    kind,
                    legacy_id,
                    new_id,
                } => Some((kind, legacy_id, new_id)),
                _ => None,
            })
            .collect()
    }

    pub fn finish_calls(&self) -> usize {
        self.finished.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl ImportHandler for RecordingImporter {
    async fn import(
        &self,
        kind: &str,
        legacy_id: i64,
        fields: Value,
        additional_data: AdditionalData,
    ) -> Result<()> {
        if self.fail_on == Some(legacy_id) {
            return Err(MigrateError::import(kind, legacy_id, "rejected by importer"));
        }
        self.handoffs.lock().unwrap().push(Handoff::Import {
            kind: kind.to_string(),
            legacy_id,
            fields,
            additional_data,
        });
        Ok(())
    }

    async fn save_new_id(&self, kind: &str, legacy_id: i64, new_id: i64) -> Result<()> {
        self.handoffs.lock().unwrap().push(Handoff::SaveNewId {
            kind: kind.to_string(),
            legacy_id,
            new_id,
        });
        Ok(())
    }

    async fn finish(&self) -> Result<()> {
        self.finished.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(())
    }
}

/// Language provider that counts how often it is asked.
#[derive(Debug, Default)]
pub struct CountingLanguages {
    languages: Vec<TargetLanguage>,
    calls: AtomicUsize,
}

impl CountingLanguages {
    pub fn german_and_english() -> Self {
        Self {
            languages: target_languages(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl LanguageProvider for CountingLanguages {
    async fn languages(&self) -> Result<Vec<TargetLanguage>> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(self.languages.clone())
    }
}

/// Target languages `de` = 1 and `en` = 2.
pub fn target_languages() -> Vec<TargetLanguage> {
    vec![
        TargetLanguage {
            code: "de".to_string(),
            id: 1,
        },
        TargetLanguage {
            code: "en".to_string(),
            id: 2,
        },
    ]
}

/// Legacy languages `de` = 10, `en` = 11 and `fr` = 12.
pub fn legacy_language_rows() -> Vec<Row> {
    [(10, "de"), (11, "en"), (12, "fr")]
        .into_iter()
        .map(|(id, code)| {
            Row::new("wcf1_language")
                .with("languageID", id)
                .with("languageCode", code)
        })
        .collect()
}

pub fn language_item(key: &str, value: &str, language_id: i64) -> Row {
    Row::new("wcf1_language_item")
        .with("languageItem", key)
        .with("languageItemValue", value)
        .with("languageID", language_id)
}

/// Object type tables registering the trophy category type as ID 12.
pub fn with_category_object_type(db: MemoryDatabase) -> MemoryDatabase {
    db.with_table(
        "wcf1_object_type_definition",
        vec![
            Row::new("wcf1_object_type_definition")
                .with("definitionID", 3)
                .with("definitionName", "com.woltlab.wcf.category"),
            Row::new("wcf1_object_type_definition")
                .with("definitionID", 4)
                .with("definitionName", "com.woltlab.wcf.clipboardItem"),
        ],
    )
    .with_table(
        "wcf1_object_type",
        vec![
            Row::new("wcf1_object_type")
                .with("objectTypeID", 11)
                .with("objectType", "com.woltlab.wcf.bbcode.smiley")
                .with("definitionID", 3),
            Row::new("wcf1_object_type")
                .with("objectTypeID", 12)
                .with("objectType", "de.wcflabs.trophies.trophy.category")
                .with("definitionID", 3),
            Row::new("wcf1_object_type")
                .with("objectTypeID", 13)
                .with("objectType", "de.wcflabs.trophies.trophy.category")
                .with("definitionID", 4),
        ],
    )
}

#[allow(clippy::too_many_arguments)]
pub fn category_row(
    id: i64,
    parent: i64,
    object_type: i64,
    title: &str,
    description: &str,
    show_order: i64,
    time: i64,
    is_disabled: bool,
) -> Row {
    Row::new("wcf1_category")
        .with("categoryID", id)
        .with("parentCategoryID", parent)
        .with("objectTypeID", object_type)
        .with("title", title)
        .with("description", description)
        .with("showOrder", show_order)
        .with("time", time)
        .with("isDisabled", i64::from(is_disabled))
}

pub fn badge_trophy_row(id: i64, title: &str, description: &str, category: i64) -> Row {
    Row::new("wcf1_trophy")
        .with("trophyID", id)
        .with("title", title)
        .with("description", description)
        .with("categoryID", category)
        .with("isDisabled", 0)
        .with("iconFile", SqlValue::Null)
        .with("iconName", "trophy")
        .with("iconColor", "rgba(255, 255, 255, 1)")
        .with("badgeColor", "rgba(0, 0, 0, 1)")
}

pub fn image_trophy_row(id: i64, title: &str, icon_file: &str) -> Row {
    Row::new("wcf1_trophy")
        .with("trophyID", id)
        .with("title", title)
        .with("description", "")
        .with("categoryID", 1)
        .with("isDisabled", 1)
        .with("iconFile", icon_file)
        .with("iconName", "")
        .with("iconColor", "")
        .with("badgeColor", "")
}

pub fn user_trophy_row(
    id: i64,
    trophy: i64,
    user: i64,
    use_trophy_description: bool,
    description: &str,
) -> Row {
    Row::new("wcf1_user_trophy")
        .with("userTrophyID", id)
        .with("trophyID", trophy)
        .with("userID", user)
        .with("time", 1_500_000_000 + id)
        .with("useTrophyDescription", i64::from(use_trophy_description))
        .with("description", description)
}

pub fn user_row(id: i64) -> Row {
    Row::new("wcf1_user")
        .with("userID", id)
        .with("username", format!("user{}", id))
}

/// Exporter over the fakes with installation 1 and no file system path.
pub fn exporter(
    db: Arc<MemoryDatabase>,
    importer: Arc<RecordingImporter>,
    selected: &[DataKind],
) -> Exporter {
    exporter_with(db, importer, selected, None)
}

pub fn exporter_with(
    db: Arc<MemoryDatabase>,
    importer: Arc<dyn ImportHandler>,
    selected: &[DataKind],
    root: Option<PathBuf>,
) -> Exporter {
    let settings = ExportSettings {
        database_prefix: "wcf1_".to_string(),
        file_system_path: root,
        selected_data: selected.iter().copied().collect::<BTreeSet<_>>(),
    };
    Exporter::new(
        db,
        importer,
        Arc::new(StaticLanguages::new(target_languages())),
        settings,
    )
}
