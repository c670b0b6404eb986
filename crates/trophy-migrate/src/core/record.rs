//! Normalized records handed to the importer.
//!
//! Each record knows its own import field layout and which of its text fields
//! are localization placeholders rather than literal text.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::{json, Value};

use super::kind::DataKind;

/// Translated values of one localization key, keyed by target language ID.
pub type LocalizedValues = BTreeMap<i64, String>;

/// Resolved localization keys.
pub type LocalizationMap = BTreeMap<String, LocalizedValues>;

/// Extra data passed alongside the import fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdditionalData {
    /// Localized values per field name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub i18n: BTreeMap<String, LocalizedValues>,

    /// Location of an image asset to copy into the target installation.
    #[serde(rename = "fileLocation", skip_serializing_if = "Option::is_none")]
    pub file_location: Option<PathBuf>,
}

/// A text field whose value is a localization placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Import field name (`title`, `description`).
    pub field: &'static str,
    /// Localization key to look up.
    pub key: String,
}

impl Placeholder {
    /// Return a placeholder when `value` is exactly `prefix` followed by `id`.
    fn detect(field: &'static str, value: &str, prefix: &str, id: i64) -> Option<Self> {
        let key = format!("{}{}", prefix, id);
        (value == key).then_some(Self { field, key })
    }
}

/// A normalized record ready for the import handoff.
pub trait ImportRecord {
    /// Kind under which the record is imported.
    const KIND: DataKind;

    /// Primary key in the legacy installation.
    fn legacy_id(&self) -> i64;

    /// Import fields in the target platform's naming.
    fn fields(&self) -> Value;

    /// Text fields holding localization placeholders.
    fn placeholders(&self) -> Vec<Placeholder>;

    /// Extra data not derived from localization.
    fn base_additional_data(&self) -> AdditionalData {
        AdditionalData::default()
    }

    /// Extra data with every resolvable placeholder attached under `i18n`.
    ///
    /// Placeholders missing from `resolved` are skipped; the literal value
    /// stays in [`fields`](Self::fields) as the fallback.
    fn additional_data(&self, resolved: &LocalizationMap) -> AdditionalData {
        let mut data = self.base_additional_data();
        for placeholder in self.placeholders() {
            if let Some(values) = resolved.get(&placeholder.key) {
                data.i18n.insert(placeholder.field.to_string(), values.clone());
            }
        }
        data
    }
}

const CATEGORY_TITLE_PREFIX: &str = "wcf.category.category.title.category";
const CATEGORY_DESCRIPTION_PREFIX: &str = "wcf.category.category.description.category";
const TROPHY_TITLE_PREFIX: &str = "wcf.user.trophy.title";
const TROPHY_DESCRIPTION_PREFIX: &str = "wcf.user.trophy.description";
const USER_TROPHY_DESCRIPTION_PREFIX: &str = "wcf.user.trophy.userTrophy.description";

/// A trophy category.
#[derive(Debug, Clone, PartialEq)]
pub struct TrophyCategory {
    pub legacy_id: i64,
    /// Parent category, `0` for top-level categories.
    pub parent_legacy_id: i64,
    pub title: String,
    pub description: String,
    pub show_order: i64,
    pub time: i64,
    pub is_disabled: bool,
}

impl ImportRecord for TrophyCategory {
    const KIND: DataKind = DataKind::TrophyCategory;

    fn legacy_id(&self) -> i64 {
        self.legacy_id
    }

    fn fields(&self) -> Value {
        json!({
            "title": self.title,
            "description": self.description,
            "showOrder": self.show_order,
            "time": self.time,
            "isDisabled": i64::from(self.is_disabled),
        })
    }

    fn placeholders(&self) -> Vec<Placeholder> {
        [
            Placeholder::detect("title", &self.title, CATEGORY_TITLE_PREFIX, self.legacy_id),
            Placeholder::detect(
                "description",
                &self.description,
                CATEGORY_DESCRIPTION_PREFIX,
                self.legacy_id,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Visual representation of a trophy.
#[derive(Debug, Clone, PartialEq)]
pub enum TrophyKind {
    /// Font icon drawn on a colored badge.
    Badge {
        icon_name: String,
        icon_color: String,
        badge_color: String,
    },
    /// Uploaded image file.
    Image { file_location: PathBuf },
}

impl TrophyKind {
    /// Trophy type code of the target platform.
    pub fn type_code(&self) -> i64 {
        match self {
            TrophyKind::Image { .. } => 1,
            TrophyKind::Badge { .. } => 2,
        }
    }
}

/// A trophy.
#[derive(Debug, Clone, PartialEq)]
pub struct Trophy {
    pub legacy_id: i64,
    pub title: String,
    pub description: String,
    pub category_legacy_id: i64,
    pub is_disabled: bool,
    pub kind: TrophyKind,
}

impl ImportRecord for Trophy {
    const KIND: DataKind = DataKind::Trophy;

    fn legacy_id(&self) -> i64 {
        self.legacy_id
    }

    fn fields(&self) -> Value {
        let mut fields = json!({
            "title": self.title,
            "description": self.description,
            "categoryID": self.category_legacy_id,
            "isDisabled": i64::from(self.is_disabled),
            "type": self.kind.type_code(),
        });
        if let TrophyKind::Badge {
            icon_name,
            icon_color,
            badge_color,
        } = &self.kind
        {
            fields["iconName"] = json!(icon_name);
            fields["iconColor"] = json!(icon_color);
            fields["badgeColor"] = json!(badge_color);
        }
        fields
    }

    fn placeholders(&self) -> Vec<Placeholder> {
        [
            Placeholder::detect("title", &self.title, TROPHY_TITLE_PREFIX, self.legacy_id),
            Placeholder::detect(
                "description",
                &self.description,
                TROPHY_DESCRIPTION_PREFIX,
                self.legacy_id,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn base_additional_data(&self) -> AdditionalData {
        match &self.kind {
            TrophyKind::Image { file_location } => AdditionalData {
                file_location: Some(file_location.clone()),
                ..Default::default()
            },
            TrophyKind::Badge { .. } => AdditionalData::default(),
        }
    }
}

/// A trophy awarded to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserTrophyAward {
    pub legacy_id: i64,
    pub trophy_legacy_id: i64,
    pub user_legacy_id: i64,
    pub time: i64,
    /// `false` means the trophy's own description is shown.
    pub use_custom_description: bool,
    /// Always empty when `use_custom_description` is `false`.
    pub description: String,
}

impl UserTrophyAward {
    /// Build an award from the legacy flag, which is named the other way round.
    pub fn new(
        legacy_id: i64,
        trophy_legacy_id: i64,
        user_legacy_id: i64,
        time: i64,
        use_trophy_description: bool,
        description: String,
    ) -> Self {
        Self {
            legacy_id,
            trophy_legacy_id,
            user_legacy_id,
            time,
            use_custom_description: !use_trophy_description,
            description: if use_trophy_description {
                String::new()
            } else {
                description
            },
        }
    }
}

impl ImportRecord for UserTrophyAward {
    const KIND: DataKind = DataKind::UserTrophy;

    fn legacy_id(&self) -> i64 {
        self.legacy_id
    }

    fn fields(&self) -> Value {
        json!({
            "trophyID": self.trophy_legacy_id,
            "userID": self.user_legacy_id,
            "time": self.time,
            "useCustomDescription": i64::from(self.use_custom_description),
            "description": self.description,
        })
    }

    fn placeholders(&self) -> Vec<Placeholder> {
        if !self.use_custom_description {
            return Vec::new();
        }
        Placeholder::detect(
            "description",
            &self.description,
            USER_TROPHY_DESCRIPTION_PREFIX,
            self.legacy_id,
        )
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn badge(id: i64, title: &str) -> Trophy {
        Trophy {
            legacy_id: id,
            title: title.to_string(),
            description: String::new(),
            category_legacy_id: 1,
            is_disabled: false,
            kind: TrophyKind::Badge {
                icon_name: "trophy".to_string(),
                icon_color: "rgba(255, 255, 255, 1)".to_string(),
                badge_color: "rgba(0, 0, 0, 1)".to_string(),
            },
        }
    }

    #[test]
    fn test_category_placeholders_use_own_id() {
        let category = TrophyCategory {
            legacy_id: 42,
            parent_legacy_id: 0,
            title: "wcf.category.category.title.category42".to_string(),
            description: "wcf.category.category.description.category41".to_string(),
            show_order: 0,
            time: 0,
            is_disabled: false,
        };
        let placeholders = category.placeholders();
        assert_eq!(placeholders.len(), 1);
        assert_eq!(placeholders[0].field, "title");
        assert_eq!(placeholders[0].key, "wcf.category.category.title.category42");
    }

    #[test]
    fn test_badge_fields_carry_colors() {
        let fields = badge(3, "Gold").fields();
        assert_eq!(fields["type"], 2);
        assert_eq!(fields["iconName"], "trophy");
        assert_eq!(fields["badgeColor"], "rgba(0, 0, 0, 1)");
        assert_eq!(badge(3, "Gold").base_additional_data(), AdditionalData::default());
    }

    #[test]
    fn test_image_fields_have_no_badge_colors() {
        let trophy = Trophy {
            kind: TrophyKind::Image {
                file_location: PathBuf::from("/srv/wcf/images/trophies/gold.png"),
            },
            ..badge(4, "Gold")
        };
        let fields = trophy.fields();
        assert_eq!(fields["type"], 1);
        assert!(fields.get("iconName").is_none());
        assert!(fields.get("iconColor").is_none());
        assert!(fields.get("badgeColor").is_none());
        assert_eq!(
            trophy.base_additional_data().file_location,
            Some(PathBuf::from("/srv/wcf/images/trophies/gold.png"))
        );
    }

    #[test]
    fn test_additional_data_attaches_only_resolved_keys() {
        let trophy = Trophy {
            description: "wcf.user.trophy.description7".to_string(),
            ..badge(7, "wcf.user.trophy.title7")
        };
        let mut resolved = LocalizationMap::new();
        resolved.insert(
            "wcf.user.trophy.title7".to_string(),
            BTreeMap::from([(1, "Gold".to_string())]),
        );

        let data = trophy.additional_data(&resolved);
        assert_eq!(data.i18n.len(), 1);
        assert_eq!(data.i18n["title"][&1_i64], "Gold");
        assert!(!data.i18n.contains_key("description"));
    }

    #[test]
    fn test_award_uses_trophy_description() {
        let award = UserTrophyAward::new(9, 3, 5, 1_500_000_000, true, "custom".to_string());
        assert!(!award.use_custom_description);
        assert_eq!(award.description, "");
        let fields = award.fields();
        assert_eq!(fields["useCustomDescription"], 0);
        assert_eq!(fields["description"], "");
        assert!(award.placeholders().is_empty());
    }

    #[test]
    fn test_award_custom_description_placeholder() {
        let award = UserTrophyAward::new(
            9,
            3,
            5,
            0,
            false,
            "wcf.user.trophy.userTrophy.description9".to_string(),
        );
        assert!(award.use_custom_description);
        assert_eq!(award.fields()["useCustomDescription"], 1);
        assert_eq!(award.placeholders().len(), 1);
    }

    #[test]
    fn test_additional_data_serialization_skips_empty() {
        let json = serde_json::to_value(AdditionalData::default()).unwrap();
        assert_eq!(json, json!({}));
    }
}
