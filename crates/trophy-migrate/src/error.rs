//! Error types for the trophy export library.

use thiserror::Error;

/// Exit code for configuration errors (invalid YAML, missing fields).
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for legacy database failures.
pub const EXIT_SOURCE_ERROR: u8 = 2;
/// Exit code for import handler failures.
pub const EXIT_IMPORT_ERROR: u8 = 3;
/// Exit code for rows that do not match the expected legacy schema.
pub const EXIT_SCHEMA_ERROR: u8 = 4;
/// Exit code for a cancelled run.
pub const EXIT_CANCELLED: u8 = 5;
/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Legacy database connection or query error with context
    #[error("Source database error: {message}\n  Context: {context}")]
    Source { message: String, context: String },

    /// A legacy row is missing a column or carries an unexpected value
    #[error("Unexpected legacy schema in {table}: {message}")]
    Schema { table: String, message: String },

    /// The import handler rejected a record
    #[error("Import of {kind} #{legacy_id} failed: {message}")]
    Import {
        kind: String,
        legacy_id: i64,
        message: String,
    },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Export was cancelled (SIGINT, etc.)
    #[error("Export cancelled")]
    Cancelled,
}

impl MigrateError {
    /// Create a Source error with context about where it occurred
    pub fn query(message: impl std::fmt::Display, context: impl Into<String>) -> Self {
        MigrateError::Source {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Create a Schema error
    pub fn schema(table: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Schema {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create an Import error
    pub fn import(kind: impl Into<String>, legacy_id: i64, message: impl std::fmt::Display) -> Self {
        MigrateError::Import {
            kind: kind.into(),
            legacy_id,
            message: message.to_string(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::Config(_) | MigrateError::Yaml(_) | MigrateError::Json(_) => {
                EXIT_CONFIG_ERROR
            }
            MigrateError::Source { .. } => EXIT_SOURCE_ERROR,
            MigrateError::Import { .. } => EXIT_IMPORT_ERROR,
            MigrateError::Schema { .. } => EXIT_SCHEMA_ERROR,
            MigrateError::Cancelled => EXIT_CANCELLED,
            MigrateError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
