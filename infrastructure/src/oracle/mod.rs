//! Oracle adapters
//!
//! [`OpenAiOracle`] implements the [`Oracle`](tq_application::Oracle) port
//! against any OpenAI-compatible chat completions endpoint.

mod openai;

pub use openai::{OpenAiOracle, OpenAiOracleConfig};
