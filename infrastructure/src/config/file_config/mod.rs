//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Method names stay strings here; [`FileConfig::to_solver_config`] turns
//! them into typed parameters and rejects unknown names.

mod consensus;
mod logging;
mod oracle;
mod output;
mod run;
mod search;

pub use consensus::FileConsensusConfig;
pub use logging::FileLoggingConfig;
pub use oracle::{FileOracleConfig, FileVerifierConfig};
pub use output::{FileOutputConfig, FileOutputFormat};
pub use run::FileRunConfig;
pub use search::FileSearchConfig;

use crate::oracle::OpenAiOracleConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tq_application::{ConsensusParams, SolverConfig};
use tq_domain::{ConfigError, Model};

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("oracle.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("oracle.model cannot be empty")]
    EmptyModelName,

    #[error("oracle.api_url cannot be empty")]
    EmptyApiUrl,

    #[error(transparent)]
    Solver(#[from] ConfigError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Search oracle endpoint and sampling
    pub oracle: FileOracleConfig,
    /// Verifier sampling overrides
    pub verifier: FileVerifierConfig,
    /// Beam search settings
    pub search: FileSearchConfig,
    /// Round loop settings
    pub consensus: FileConsensusConfig,
    /// Benchmark run settings
    pub run: FileRunConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log file destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Typed solver configuration, validated
    pub fn to_solver_config(&self) -> Result<SolverConfig, ConfigError> {
        let mut config = SolverConfig::from_names(
            self.search.task.trim(),
            &self.search.method_generate,
            &self.search.method_evaluate,
            &self.search.method_select,
            &self.search.prompt_sample,
        )?;

        config.search = config.search.with_samples(
            self.search.n_generate_sample,
            self.search.n_evaluate_sample,
            self.search.n_select_sample,
        );
        config.search.cache_value = self.search.cache_value;
        config.search.max_concurrency = self.search.max_concurrency;

        let config = config
            .with_consensus(
                ConsensusParams::default()
                    .with_reasoners(self.consensus.reasoners)
                    .with_max_rounds(self.consensus.max_rounds)
                    .with_agreement_threshold(self.consensus.agreement_threshold),
            )
            .with_seed(self.consensus.seed);

        config.validate()?;
        Ok(config)
    }

    /// Connection settings for the search oracle
    pub fn search_oracle_config(&self) -> OpenAiOracleConfig {
        self.oracle.to_oracle_config()
    }

    /// Connection settings for the verifier oracle (same endpoint and model
    /// unless overridden, verifier sampling)
    pub fn verifier_oracle_config(&self) -> OpenAiOracleConfig {
        let mut config = self.oracle.to_oracle_config();
        if let Some(model) = &self.verifier.model {
            config.model = Model::from(model.as_str());
        }
        config.temperature = self.verifier.temperature;
        config.top_p = self.verifier.top_p;
        config
    }

    /// Validate everything needed before the first oracle call
    pub fn validate(&self) -> Result<SolverConfig, ConfigValidationError> {
        if self.oracle.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.oracle.api_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApiUrl);
        }
        if self.oracle.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        Ok(self.to_solver_config()?)
    }
}
