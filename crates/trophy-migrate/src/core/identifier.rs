//! Legacy table naming and identifier quoting.
//!
//! A single legacy database can host several installations side by side. Each
//! installation's tables carry the prefix `wcf{N}_`, where `N` is the
//! installation number. The number is parsed once from the configured table
//! prefix and then passed explicitly to every query builder as an
//! [`Installation`].
//!
//! # Security
//!
//! Table and column names cannot be bound as parameters, so every identifier
//! that ends up in rendered SQL goes through [`quote_mysql`].

use std::fmt;

use crate::error::{MigrateError, Result};

/// Maximum identifier length accepted by MySQL.
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Prefix used by a default single-installation setup.
pub const DEFAULT_TABLE_PREFIX: &str = "wcf1_";

/// Tables of the legacy schema read by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyTable {
    Category,
    Trophy,
    UserTrophy,
    User,
    LanguageItem,
    Language,
    ObjectType,
    ObjectTypeDefinition,
}

impl LegacyTable {
    /// Unprefixed table name.
    pub fn name(self) -> &'static str {
        match self {
            LegacyTable::Category => "category",
            LegacyTable::Trophy => "trophy",
            LegacyTable::UserTrophy => "user_trophy",
            LegacyTable::User => "user",
            LegacyTable::LanguageItem => "language_item",
            LegacyTable::Language => "language",
            LegacyTable::ObjectType => "object_type",
            LegacyTable::ObjectTypeDefinition => "object_type_definition",
        }
    }
}

/// Installation number of the legacy tables being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Installation(u32);

impl Installation {
    /// Create an installation handle for a known number.
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Parse the installation number from a table prefix of the form `wcf{N}_`.
    ///
    /// Prefixes that do not match the pattern fall back to installation `0`.
    pub fn from_prefix(prefix: &str) -> Self {
        prefix
            .strip_prefix("wcf")
            .and_then(|rest| rest.strip_suffix('_'))
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(Self)
            .unwrap_or_default()
    }

    /// The installation number.
    pub fn number(self) -> u32 {
        self.0
    }

    /// Fully prefixed name of a legacy table.
    pub fn table(self, table: LegacyTable) -> String {
        format!("wcf{}_{}", self.0, table.name())
    }
}

impl fmt::Display for Installation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wcf{}", self.0)
    }
}

/// Validate an identifier for security issues.
///
/// Rejects empty identifiers, identifiers containing null bytes and
/// identifiers exceeding the MySQL length limit.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MigrateError::Config(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(MigrateError::Config(format!(
            "SECURITY: Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(MigrateError::Config(format!(
            "SECURITY: Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote a MySQL identifier using backticks.
///
/// Escapes backticks by doubling them and wraps in backticks.
pub fn quote_mysql(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}
