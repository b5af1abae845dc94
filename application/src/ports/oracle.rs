//! Oracle port
//!
//! Defines the interface to the completion-generating service. The oracle is
//! a black box: a prompt and a sample count in, a list of completions out.

use async_trait::async_trait;
use thiserror::Error;
use tq_domain::Model;

/// Errors that can occur during oracle calls
///
/// The core never retries; these propagate to the caller, which owns the
/// retry policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl OracleError {
    /// Whether a caller-level retry has a chance of succeeding
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OracleError::RateLimited(_) | OracleError::Timeout | OracleError::ConnectionError(_)
        )
    }
}

/// Completion oracle
///
/// Implementations (adapters) live in the infrastructure layer and are
/// constructed once with their model and sampling configuration.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Model answering the calls
    fn model(&self) -> &Model;

    /// Request `samples` independent completions of `prompt`.
    ///
    /// Generation stops at `stop` when given.
    async fn complete(
        &self,
        prompt: &str,
        samples: usize,
        stop: Option<&str>,
    ) -> Result<Vec<String>, OracleError>;
}
