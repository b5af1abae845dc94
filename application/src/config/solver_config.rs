//! Solver configuration.
//!
//! [`SolverConfig`] is the fully typed, validated form of everything a solve
//! needs. The binary builds it from the layered file config plus CLI flags;
//! a [`ConfigError`] here aborts the run before any oracle is constructed.

use super::consensus_params::ConsensusParams;
use serde::{Deserialize, Serialize};
use tq_domain::{
    ConfigError, EvaluationMethod, GenerationMethod, PromptStyle, SearchParams, SelectionMethod,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Registry name of the reasoning task
    pub task: String,
    pub search: SearchParams,
    pub consensus: ConsensusParams,
    /// Seed of the controller RNG (per-reasoner seeds and tie-breaks)
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            task: "gsm8k".to_string(),
            search: SearchParams::default(),
            consensus: ConsensusParams::default(),
            seed: 10,
        }
    }
}

impl SolverConfig {
    /// Build from the raw method names found in config files or flags.
    ///
    /// Unknown names are rejected rather than defaulted.
    pub fn from_names(
        task: impl Into<String>,
        method_generate: &str,
        method_evaluate: &str,
        method_select: &str,
        prompt_sample: &str,
    ) -> Result<Self, ConfigError> {
        let search = SearchParams::default()
            .with_generation(method_generate.parse::<GenerationMethod>()?)
            .with_evaluation(method_evaluate.parse::<EvaluationMethod>()?)
            .with_selection(method_select.parse::<SelectionMethod>()?)
            .with_prompt_style(prompt_sample.parse::<PromptStyle>()?);

        Ok(Self {
            task: task.into(),
            search,
            ..Self::default()
        })
    }

    pub fn with_search(mut self, search: SearchParams) -> Self {
        self.search = search;
        self
    }

    pub fn with_consensus(mut self, consensus: ConsensusParams) -> Self {
        self.consensus = consensus;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.task.trim().is_empty() {
            return Err(ConfigError::UnknownTask(self.task.clone()));
        }
        self.search.validate()?;
        self.consensus.validate()
    }
}
