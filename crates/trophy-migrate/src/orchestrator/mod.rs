//! Export orchestrator - main workflow coordinator.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::kind::DataKind;
use crate::error::{MigrateError, Result};
use crate::export::{Exporter, MARKER_FILE};
use crate::import::{JsonLinesImportHandler, StaticLanguages};
use crate::source::MysqlSource;

/// Export orchestrator.
pub struct Orchestrator {
    exporter: Exporter,
}

/// Per-kind outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct KindResult {
    /// Kind name.
    pub kind: DataKind,

    /// Rows counted before the export started.
    pub total: i64,

    /// Records handed to the importer.
    pub exported: i64,

    /// Batches executed.
    pub batches: u64,
}

/// Result of an export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    /// Unique run identifier.
    pub run_id: String,

    /// Final status: `completed` or `dry_run`.
    pub status: String,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// When the export started.
    pub started_at: DateTime<Utc>,

    /// When the export completed.
    pub completed_at: DateTime<Utc>,

    /// Per-kind results in queue order.
    pub kinds: Vec<KindResult>,

    /// Total records handed to the importer.
    pub records_exported: i64,

    /// Average throughput (records/second).
    pub records_per_second: i64,
}

impl Orchestrator {
    /// Create an orchestrator reading from MySQL and writing JSON Lines.
    pub async fn new(config: Config) -> Result<Self> {
        let source = MysqlSource::new(&config.source).await?;
        let importer = JsonLinesImportHandler::new(&config.target.output);
        let languages = StaticLanguages::new(config.target.languages.clone());

        let exporter = Exporter::new(
            Arc::new(source),
            Arc::new(importer),
            Arc::new(languages),
            config.export_settings(),
        );
        Ok(Self { exporter })
    }

    /// Create an orchestrator around an existing exporter.
    pub fn with_exporter(exporter: Exporter) -> Self {
        Self { exporter }
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    /// Check database and file access.
    pub async fn validate(&self) -> Result<()> {
        self.exporter.validate_database_access().await?;

        if !self.exporter.validate_file_access() {
            return Err(MigrateError::Config(format!(
                "source.file_system_path must point to the legacy installation ({} not found)",
                MARKER_FILE
            )));
        }

        info!("Validation passed for {}", self.exporter.installation());
        Ok(())
    }

    /// Run the export.
    ///
    /// With `dry_run` only the counts are collected and the importer is never
    /// called. Cancellation is checked before every batch and returns
    /// [`MigrateError::Cancelled`]. A run that stops early for any reason
    /// flushes what was already handed off before returning the error.
    pub async fn run(&self, cancel: CancellationToken, dry_run: bool) -> Result<ExportResult> {
        let started_at = Utc::now();
        let timer = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        info!("Starting export run: {}", run_id);
        self.validate().await?;

        let queue = self.exporter.queue();
        if queue.is_empty() {
            warn!("Nothing selected for export");
        }

        let kinds = match self.export_queue(&queue, &cancel, dry_run).await {
            Ok(kinds) => kinds,
            Err(e) => {
                if !dry_run {
                    // keep what was already handed off before reporting the error
                    if let Err(flush) = self.exporter.finish().await {
                        warn!("Failed to flush handoffs after error: {}", flush);
                    }
                }
                return Err(e);
            }
        };

        if !dry_run {
            self.exporter.finish().await?;
        }

        let completed_at = Utc::now();
        let duration = timer.elapsed().as_secs_f64();
        let records_exported: i64 = kinds.iter().map(|k| k.exported).sum();
        let records_per_second = if duration > 0.0 {
            (records_exported as f64 / duration) as i64
        } else {
            0
        };

        let result = ExportResult {
            run_id,
            status: if dry_run { "dry_run" } else { "completed" }.to_string(),
            duration_seconds: duration,
            started_at,
            completed_at,
            kinds,
            records_exported,
            records_per_second,
        };

        info!(
            "Export {}: {} kinds, {} records in {:.1}s ({} records/s)",
            result.status,
            result.kinds.len(),
            result.records_exported,
            result.duration_seconds,
            result.records_per_second
        );

        Ok(result)
    }

    /// Count and export every queued kind in order.
    async fn export_queue(
        &self,
        queue: &[DataKind],
        cancel: &CancellationToken,
        dry_run: bool,
    ) -> Result<Vec<KindResult>> {
        let mut kinds = Vec::with_capacity(queue.len());
        for &kind in queue {
            let total = self.exporter.count(kind).await?;
            info!("{}: {} rows", kind, total);

            let mut result = KindResult {
                kind,
                total,
                exported: 0,
                batches: 0,
            };

            if !dry_run {
                if let Err(e) = self.export_kind(kind, &mut result, cancel).await {
                    if matches!(e, MigrateError::Cancelled) {
                        warn!("Export cancelled during {}", kind);
                    }
                    return Err(e);
                }
            }

            kinds.push(result);
        }
        Ok(kinds)
    }

    /// Page through one kind until the counted rows are exhausted.
    async fn export_kind(
        &self,
        kind: DataKind,
        result: &mut KindResult,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let total = u64::try_from(result.total).unwrap_or(0);
        let limit = Exporter::limit(kind).unwrap_or(total).max(1);

        let mut offset = 0;
        while offset < total {
            if cancel.is_cancelled() {
                return Err(MigrateError::Cancelled);
            }

            let exported = self.exporter.export(kind, offset, limit).await?;
            result.exported += exported as i64;
            result.batches += 1;
            info!(
                "{}: batch {} exported {} ({}/{})",
                kind, result.batches, exported, result.exported, result.total
            );

            offset += limit;
        }

        Ok(())
    }

    /// Close the legacy database connection.
    pub async fn close(&self) {
        self.exporter.close().await;
    }
}

impl ExportResult {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
