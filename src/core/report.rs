use crate::core::engine::CloneRequest;
use crate::domain::outcome::{BatchResult, DatasetResult};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Summary of a finished run, written as JSON next to the logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub target_catalog: String,
    pub overwrite: bool,
    pub successes: usize,
    pub failures: usize,
    pub results: Vec<DatasetResult>,
}

impl RunReport {
    pub fn new(request: &CloneRequest, started_at: DateTime<Utc>, batch: BatchResult) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            target_catalog: request.target_catalog.clone(),
            overwrite: request.overwrite,
            successes: batch.successes,
            failures: batch.failures,
            results: batch.results,
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Run report written to {}", path.display());
        Ok(())
    }
}
