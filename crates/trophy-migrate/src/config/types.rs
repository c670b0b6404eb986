//! Configuration type definitions.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::identifier::DEFAULT_TABLE_PREFIX;
use crate::core::kind::DataKind;
use crate::core::traits::TargetLanguage;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Legacy installation (MySQL) configuration.
    pub source: SourceConfig,

    /// Target installation configuration.
    pub target: TargetConfig,

    /// Export behavior configuration.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Legacy installation configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Database host.
    pub host: String,

    /// Database port (default: 3306).
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password. Never serialized.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Table prefix of the legacy installation (default: "wcf1_").
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,

    /// Root directory of the legacy installation, used for trophy images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_system_path: Option<PathBuf>,

    /// Maximum pooled connections (default: 2).
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("table_prefix", &self.table_prefix)
            .field("file_system_path", &self.file_system_path)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Target installation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// File receiving the import hand-off as JSON lines (default: "export.jsonl").
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Languages of the target installation.
    #[serde(default)]
    pub languages: Vec<TargetLanguage>,
}

/// Export behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Data kinds to export (default: all).
    #[serde(default = "default_selected_data")]
    pub selected_data: BTreeSet<DataKind>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            selected_data: default_selected_data(),
        }
    }
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_table_prefix() -> String {
    DEFAULT_TABLE_PREFIX.to_string()
}

fn default_max_connections() -> u32 {
    2
}

fn default_output() -> PathBuf {
    PathBuf::from("export.jsonl")
}

fn default_selected_data() -> BTreeSet<DataKind> {
    DataKind::ALL.into_iter().collect()
}
