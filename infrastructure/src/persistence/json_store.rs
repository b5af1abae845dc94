//! JSON checkpoint file.
//!
//! Writes go to a sibling temp file first and are renamed into place, so an
//! interrupted save never leaves a truncated checkpoint behind.

use std::path::{Path, PathBuf};
use tq_application::{BenchmarkReport, ResultStore, StoreError};
use tracing::debug;

pub struct JsonResultStore {
    path: PathBuf,
}

impl JsonResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultStore for JsonResultStore {
    fn load(&self) -> Result<Option<BenchmarkReport>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)?;
        let report = serde_json::from_str(&text)?;
        debug!("Loaded checkpoint {}", self.path.display());
        Ok(Some(report))
    }

    fn save(&self, report: &BenchmarkReport) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(report)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(
            "Saved {} results to {}",
            report.results.len(),
            self.path.display()
        );
        Ok(())
    }
}
