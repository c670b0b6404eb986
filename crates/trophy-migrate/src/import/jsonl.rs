//! JSON Lines import handler.
//!
//! Each handoff becomes one line tagged with its `op`:
//!
//! ```text
//! {"op":"import","kind":"com.woltlab.wcf.trophy","legacy_id":1,"data":{...},"additional_data":{...}}
//! {"op":"save_new_id","kind":"com.woltlab.wcf.user","legacy_id":5,"new_id":5}
//! ```
//!
//! A repeated `(op, kind, legacy_id)` is written only once.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::record::AdditionalData;
use crate::core::traits::ImportHandler;
use crate::error::{MigrateError, Result};

/// One line of the handoff file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HandoffLine {
    Import {
        kind: String,
        legacy_id: i64,
        data: Value,
        additional_data: Value,
    },
    SaveNewId {
        kind: String,
        legacy_id: i64,
        new_id: i64,
    },
}

impl HandoffLine {
    fn op(&self) -> &'static str {
        match self {
            HandoffLine::Import { .. } => "import",
            HandoffLine::SaveNewId { .. } => "save_new_id",
        }
    }

    fn key(&self) -> (&'static str, String, i64) {
        match self {
            HandoffLine::Import {
                kind, legacy_id, ..
            }
            | HandoffLine::SaveNewId {
                kind, legacy_id, ..
            } => (self.op(), kind.clone(), *legacy_id),
        }
    }
}

struct WriterState {
    writer: Option<BufWriter<File>>,
    seen: HashSet<(&'static str, String, i64)>,
    lines: u64,
}

impl WriterState {
    /// The output writer, creating the file on first use.
    async fn writer(&mut self, path: &Path) -> Result<&mut BufWriter<File>> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                debug!("Writing handoffs to {}", path.display());
                BufWriter::new(File::create(path).await?)
            }
        };
        Ok(self.writer.insert(writer))
    }
}

/// Writes handoffs to a JSON Lines file.
///
/// The file is created (or truncated) by the first handoff or by
/// [`finish`](ImportHandler::finish), so a handler that is never used leaves
/// an existing file untouched.
pub struct JsonLinesImportHandler {
    path: PathBuf,
    state: Mutex<WriterState>,
}

impl JsonLinesImportHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(WriterState {
                writer: None,
                seen: HashSet::new(),
                lines: 0,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines written so far.
    pub async fn lines_written(&self) -> u64 {
        self.state.lock().await.lines
    }

    async fn write(&self, line: HandoffLine) -> Result<()> {
        let mut state = self.state.lock().await;
        let key = line.key();
        if state.seen.contains(&key) {
            debug!("Skipping repeated {} of {} {}", key.0, key.1, key.2);
            return Ok(());
        }

        let mut bytes = serde_json::to_vec(&line)?;
        bytes.push(b'\n');
        state.writer(&self.path).await?.write_all(&bytes).await?;
        state.seen.insert(key);
        state.lines += 1;
        Ok(())
    }
}

#[async_trait]
impl ImportHandler for JsonLinesImportHandler {
    async fn import(
        &self,
        kind: &str,
        legacy_id: i64,
        fields: Value,
        additional_data: AdditionalData,
    ) -> Result<()> {
        let additional_data = serde_json::to_value(&additional_data)
            .map_err(|e| MigrateError::import(kind, legacy_id, e))?;
        self.write(HandoffLine::Import {
            kind: kind.to_string(),
            legacy_id,
            data: fields,
            additional_data,
        })
        .await
    }

    async fn save_new_id(&self, kind: &str, legacy_id: i64, new_id: i64) -> Result<()> {
        self.write(HandoffLine::SaveNewId {
            kind: kind.to_string(),
            legacy_id,
            new_id,
        })
        .await
    }

    async fn finish(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.writer(&self.path).await?.flush().await?;
        info!("Wrote {} handoff lines to {}", state.lines, self.path.display());
        Ok(())
    }
}
