//! Consensus configuration from TOML (`[consensus]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    pub reasoners: usize,
    pub max_rounds: usize,
    pub agreement_threshold: usize,
    /// Controller RNG seed
    pub seed: u64,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            reasoners: 3,
            max_rounds: 3,
            agreement_threshold: 2,
            seed: 10,
        }
    }
}
