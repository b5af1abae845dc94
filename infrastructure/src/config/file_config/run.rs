//! Benchmark run configuration from TOML (`[run]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw benchmark run configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunConfig {
    /// Root directory of result files
    pub output_root: String,
    /// Experiment label used in the result file name
    pub label: String,
    /// Dataset split name used in the result file name
    pub split: String,
    /// Number of problems to run; non-positive means all
    pub test_number: i64,
    /// Checkpoint interval in solved problems
    pub save_every: usize,
}

impl Default for FileRunConfig {
    fn default() -> Self {
        Self {
            output_root: "./results".to_string(),
            label: "exp0".to_string(),
            split: "val".to_string(),
            test_number: 10,
            save_every: 10,
        }
    }
}

impl FileRunConfig {
    /// `{output_root}/{model}/{label}_{split}_seed_{seed}.json`
    pub fn result_file(&self, model: &str, seed: u64) -> PathBuf {
        PathBuf::from(&self.output_root)
            .join(model)
            .join(format!("{}_{}_seed_{}.json", self.label, self.split, seed))
    }

    /// Problem limit, `None` for the whole dataset
    pub fn limit(&self) -> Option<usize> {
        usize::try_from(self.test_number).ok().filter(|n| *n > 0)
    }
}
