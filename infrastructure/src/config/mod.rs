//! Configuration file loading for thought-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TQ_`-prefixed environment variables (`TQ_SEARCH__N_SELECT_SAMPLE=3`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./thought-quorum.toml` or `./.thought-quorum.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/thought-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileConsensusConfig, FileLoggingConfig, FileOracleConfig,
    FileOutputConfig, FileOutputFormat, FileRunConfig, FileSearchConfig, FileVerifierConfig,
};
pub use loader::ConfigLoader;
