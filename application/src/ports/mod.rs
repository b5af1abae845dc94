//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod composite_progress;
pub mod conversation_logger;
pub mod oracle;
pub mod progress;
pub mod result_store;
pub mod verifier;
