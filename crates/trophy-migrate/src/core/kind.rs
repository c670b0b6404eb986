//! Exportable data kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MigrateError;

/// Kind name under which legacy user IDs are registered with the importer.
pub const USER_KIND: &str = "com.woltlab.wcf.user";

/// A kind of record the exporter can hand to the importer.
///
/// Kinds are identified by the target platform's object type names, which is
/// also how they appear in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataKind {
    #[serde(rename = "com.woltlab.wcf.trophy.category")]
    TrophyCategory,

    #[serde(rename = "de.wcflabs.trophies.trophyExporter.user.fakeImport")]
    UserFakeImport,

    #[serde(rename = "com.woltlab.wcf.trophy")]
    Trophy,

    #[serde(rename = "com.woltlab.wcf.userTrophy")]
    UserTrophy,
}

impl DataKind {
    /// All kinds, in export order.
    pub const ALL: [DataKind; 4] = [
        DataKind::TrophyCategory,
        DataKind::UserFakeImport,
        DataKind::Trophy,
        DataKind::UserTrophy,
    ];

    /// Object type name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            DataKind::TrophyCategory => "com.woltlab.wcf.trophy.category",
            DataKind::UserFakeImport => "de.wcflabs.trophies.trophyExporter.user.fakeImport",
            DataKind::Trophy => "com.woltlab.wcf.trophy",
            DataKind::UserTrophy => "com.woltlab.wcf.userTrophy",
        }
    }

    /// Rows per export batch; `None` exports everything in a single batch.
    pub fn page_size(self) -> Option<u64> {
        match self {
            DataKind::TrophyCategory => None,
            DataKind::Trophy | DataKind::UserTrophy => Some(100),
            DataKind::UserFakeImport => Some(250),
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataKind {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| MigrateError::Config(format!("unknown data kind '{}'", s)))
    }
}
