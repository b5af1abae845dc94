//! Domain error types

use thiserror::Error;

/// Configuration errors.
///
/// Raised while turning configuration values into typed policies, before any
/// oracle is contacted. Unknown names are never silently defaulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown generation method: {0} (valid: sample, propose)")]
    UnknownGenerationMethod(String),

    #[error("Unknown evaluation method: {0} (valid: value, vote)")]
    UnknownEvaluationMethod(String),

    #[error("Unknown selection method: {0} (valid: greedy, sample)")]
    UnknownSelectionMethod(String),

    #[error("Unknown prompt style: {0} (valid: standard, cot)")]
    UnknownPromptStyle(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DomainError {
    /// Check if this error came from configuration
    pub fn is_config(&self) -> bool {
        matches!(self, DomainError::Config(_))
    }
}
