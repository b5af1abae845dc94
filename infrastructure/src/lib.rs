//! Infrastructure layer for thought-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod dataset;
pub mod logging;
pub mod oracle;
pub mod persistence;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileConsensusConfig, FileLoggingConfig,
    FileOracleConfig, FileOutputConfig, FileOutputFormat, FileRunConfig, FileSearchConfig,
    FileVerifierConfig,
};
pub use dataset::{DatasetError, JsonlDataset};
pub use logging::JsonlConversationLogger;
pub use oracle::{OpenAiOracle, OpenAiOracleConfig};
pub use persistence::JsonResultStore;
