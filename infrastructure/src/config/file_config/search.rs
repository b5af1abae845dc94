//! Search configuration from TOML (`[search]` section)

use serde::{Deserialize, Serialize};

/// Raw beam search configuration from TOML
///
/// Method names are validated when converted to a `SolverConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    /// Registry name of the reasoning task
    pub task: String,
    /// "sample" or "propose"
    pub method_generate: String,
    /// "value" or "vote"
    pub method_evaluate: String,
    /// "greedy" or "sample"
    pub method_select: String,
    /// "standard" or "cot"
    pub prompt_sample: String,
    pub n_generate_sample: usize,
    pub n_evaluate_sample: usize,
    pub n_select_sample: usize,
    pub cache_value: bool,
    pub max_concurrency: usize,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        Self {
            task: "gsm8k".to_string(),
            method_generate: "sample".to_string(),
            method_evaluate: "vote".to_string(),
            method_select: "greedy".to_string(),
            prompt_sample: "cot".to_string(),
            n_generate_sample: 5,
            n_evaluate_sample: 5,
            n_select_sample: 1,
            cache_value: true,
            max_concurrency: 4,
        }
    }
}
