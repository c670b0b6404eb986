//! # trophy-migrate
//!
//! Exports trophies from legacy WCFLabs trophy installations into the import
//! format of the current WoltLab Suite trophy system.
//!
//! The library reads from the legacy tables and hands normalized records to
//! an import handler:
//!
//! - **Trophy categories**, parents before their children
//! - **Trophies**, as either badges or image trophies
//! - **User trophies**, with custom descriptions where the legacy award had one
//! - **Legacy user IDs**, registered as identity mappings for the awards
//!
//! Localized titles and descriptions are resolved against the target
//! installation's languages and attached to each record.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use trophy_migrate::{Config, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> trophy_migrate::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let orchestrator = Orchestrator::new(config).await?;
//!     let result = orchestrator.run(CancellationToken::new(), false).await?;
//!     println!("Exported {} records", result.records_exported);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod import;
pub mod orchestrator;
pub mod source;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use config::{Config, ExportConfig, SourceConfig, TargetConfig};
pub use crate::core::{DataKind, ImportHandler, LanguageProvider, LegacyDatabase, TargetLanguage};
pub use error::{MigrateError, Result};
pub use export::{build_queue, ExportSettings, Exporter};
pub use import::{JsonLinesImportHandler, StaticLanguages};
pub use orchestrator::{ExportResult, KindResult, Orchestrator};
pub use source::MysqlSource;
