//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ConsensusParams`]: round loop control (reasoners, rounds, agreement)
//! - [`SolverConfig`]: everything a solve needs, validated before any oracle call

pub mod consensus_params;
pub mod solver_config;

pub use consensus_params::ConsensusParams;
pub use solver_config::SolverConfig;
