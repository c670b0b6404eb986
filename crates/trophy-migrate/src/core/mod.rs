//! Core abstractions of the trophy export.
//!
//! - [`identifier`]: installation-prefixed table names and identifier quoting
//! - [`kind`]: the exportable data kinds
//! - [`query`]: structured SELECT queries against legacy tables
//! - [`record`]: normalized records and their import layout
//! - [`traits`]: the legacy database, import handler and language boundaries
//! - [`value`]: SQL values and rows

pub mod identifier;
pub mod kind;
pub mod query;
pub mod record;
pub mod traits;
pub mod value;

pub use identifier::{Installation, LegacyTable, DEFAULT_TABLE_PREFIX};
pub use kind::{DataKind, USER_KIND};
pub use query::{Condition, SelectQuery};
pub use record::{
    AdditionalData, ImportRecord, LocalizationMap, LocalizedValues, Placeholder, Trophy,
    TrophyCategory, TrophyKind, UserTrophyAward,
};
pub use traits::{ImportHandler, LanguageProvider, LegacyDatabase, TargetLanguage};
pub use value::{Row, SqlValue};
