//! Verifier port
//!
//! Judges whether a completed reasoning trace is valid.

use super::oracle::OracleError;
use async_trait::async_trait;

/// Outcome of one verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    /// Free-text explanation returned by the judge
    pub rationale: String,
}

impl Verdict {
    pub fn new(valid: bool, rationale: impl Into<String>) -> Self {
        Self {
            valid,
            rationale: rationale.into(),
        }
    }
}

/// Stateless classification of reasoning traces
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn judge(&self, reasoning: &str, problem: &str) -> Result<Verdict, OracleError>;
}
