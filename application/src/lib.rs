//! Application layer for thought-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ConsensusParams, SolverConfig};
pub use ports::{
    composite_progress::CompositeProgressNotifier,
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    oracle::{Oracle, OracleError},
    progress::{NoProgress, ProgressNotifier},
    result_store::{BenchmarkReport, ResultStore, StoreError},
    verifier::{Verdict, Verifier},
};
pub use use_cases::beam_search::{BeamSearchUseCase, SearchError, SearchOutput};
pub use use_cases::consensus::{
    ConsensusUseCase, Reasoner, ReasonerSlot, Reasoning, Resolution, ResolveError,
};
pub use use_cases::logging_oracle::LoggingOracle;
pub use use_cases::run_benchmark::{
    BenchmarkError, BenchmarkItem, RunBenchmarkInput, RunBenchmarkUseCase,
};
pub use use_cases::scoring::{Scorer, ValueScorer, VoteScorer};
pub use use_cases::verify::OracleVerifier;
