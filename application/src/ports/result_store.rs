//! Result store port
//!
//! Persists the benchmark checkpoint so an interrupted run can resume.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur while loading or saving results
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid result file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Persisted benchmark record.
///
/// `results` maps problem id to predicted answer and `outputs` maps problem
/// id to the full consensus history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Accuracy in percent over the problems answered so far
    pub acc: f64,
    pub correct: usize,
    pub count: usize,
    /// Run arguments, echoed verbatim
    pub args: serde_json::Value,
    pub results: BTreeMap<String, String>,
    pub outputs: BTreeMap<String, String>,
}

impl BenchmarkReport {
    pub fn new(args: serde_json::Value) -> Self {
        Self {
            args,
            ..Self::default()
        }
    }

    pub fn is_done(&self, id: &str) -> bool {
        self.results.contains_key(id)
    }

    /// Record one answered problem and refresh the accuracy
    pub fn record(&mut self, id: impl Into<String>, answer: String, history: String, correct: bool) {
        let id = id.into();
        self.results.insert(id.clone(), answer);
        self.outputs.insert(id, history);
        if correct {
            self.correct += 1;
        }
        self.count = self.results.len();
        self.acc = self.correct as f64 / self.results.len() as f64 * 100.0;
    }
}

/// Checkpoint storage
pub trait ResultStore: Send + Sync {
    /// Load the existing checkpoint, if any
    fn load(&self) -> Result<Option<BenchmarkReport>, StoreError>;

    fn save(&self, report: &BenchmarkReport) -> Result<(), StoreError>;
}
