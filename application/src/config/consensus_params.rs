//! Consensus parameters for the round loop
//!
//! [`ConsensusParams`] groups the static parameters of the round loop in
//! [`ConsensusUseCase`](crate::use_cases::consensus::ConsensusUseCase).

use serde::{Deserialize, Serialize};
use tq_domain::ConfigError;

/// Upper bound on `max_rounds`
pub const MAX_ROUNDS_CAP: usize = 3;

/// Round loop control parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Independent beam searches per round
    pub reasoners: usize,
    /// Hard cap on rounds before the fallback decision
    pub max_rounds: usize,
    /// Identical verified answers needed to stop early
    pub agreement_threshold: usize,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            reasoners: 3,
            max_rounds: 3,
            agreement_threshold: 2,
        }
    }
}

impl ConsensusParams {
    // ==================== Builder Methods ====================

    pub fn with_reasoners(mut self, reasoners: usize) -> Self {
        self.reasoners = reasoners;
        self
    }

    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_agreement_threshold(mut self, threshold: usize) -> Self {
        self.agreement_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reasoners == 0 {
            return Err(ConfigError::invalid("reasoners", "must be at least 1"));
        }
        if self.max_rounds == 0 || self.max_rounds > MAX_ROUNDS_CAP {
            return Err(ConfigError::invalid(
                "max_rounds",
                format!("must be between 1 and {}", MAX_ROUNDS_CAP),
            ));
        }
        if self.agreement_threshold == 0 || self.agreement_threshold > self.reasoners {
            return Err(ConfigError::invalid(
                "agreement_threshold",
                format!("must be between 1 and reasoners ({})", self.reasoners),
            ));
        }
        Ok(())
    }
}
