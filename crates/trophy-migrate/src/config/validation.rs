//! Configuration validation.

use std::collections::HashSet;

use tracing::warn;

use super::Config;
use crate::core::kind::DataKind;
use crate::error::{MigrateError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    // Source validation
    if config.source.host.is_empty() {
        return Err(MigrateError::Config("source.host is required".into()));
    }
    if config.source.database.is_empty() {
        return Err(MigrateError::Config("source.database is required".into()));
    }
    if config.source.user.is_empty() {
        return Err(MigrateError::Config("source.user is required".into()));
    }
    if config.source.max_connections == 0 {
        return Err(MigrateError::Config(
            "source.max_connections must be at least 1".into(),
        ));
    }

    // Target validation
    if config.target.languages.is_empty() {
        return Err(MigrateError::Config(
            "target.languages must list at least one language".into(),
        ));
    }
    let mut codes = HashSet::new();
    let mut ids = HashSet::new();
    for language in &config.target.languages {
        if language.code.is_empty() {
            return Err(MigrateError::Config(
                "target.languages entries need a code".into(),
            ));
        }
        if !codes.insert(language.code.as_str()) {
            return Err(MigrateError::Config(format!(
                "target.languages lists code '{}' twice",
                language.code
            )));
        }
        if !ids.insert(language.id) {
            return Err(MigrateError::Config(format!(
                "target.languages lists id {} twice",
                language.id
            )));
        }
    }

    // Export validation
    let selected = &config.export.selected_data;
    if selected.contains(&DataKind::UserTrophy) && !selected.contains(&DataKind::Trophy) {
        warn!(
            "{} is selected without {}; user trophies will be skipped",
            DataKind::UserTrophy,
            DataKind::Trophy
        );
    }

    Ok(())
}
