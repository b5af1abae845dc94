//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the model served by the completion oracle
//! - [`problem::Problem`]: a validated problem to reason about
//! - [`error::DomainError`] / [`error::ConfigError`]: domain-level errors

pub mod error;
pub mod model;
pub mod problem;
