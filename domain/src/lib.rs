//! Domain layer for thought-quorum
//!
//! This crate contains the core search and consensus logic, entities, and
//! value objects. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Beam search over thoughts
//!
//! A [`Thought`] is a growing reasoning path. Each search step expands every
//! thought of the [`Beam`], scores the flattened candidates and keeps the best
//! `n_select_sample` of them.
//!
//! ## Quorum consensus
//!
//! Several independent searches ("reasoners") answer the same [`Problem`].
//! Verified answers are reconciled by frequency voting over bounded rounds;
//! see [`quorum`].

pub mod config;
pub mod core;
pub mod prompt;
pub mod quorum;
pub mod search;
pub mod task;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{
    error::{ConfigError, DomainError},
    model::Model,
    problem::Problem,
};
pub use prompt::{Gsm8kTemplate, VerifierTemplate};
pub use quorum::{
    AnswerTally, ConsensusLedger, ConsensusOutcome, History, ReasonerOutcome, RoundRecord,
    parse_verification, parse_vote_choice, tally_votes,
};
pub use search::{
    Beam, CacheStats, EvaluationMethod, GenerationMethod, PromptStyle, ScoreCache, SearchParams,
    SearchTrace, SelectionMethod, StepRecord, Thought,
};
pub use task::{Gsm8kTask, ReasoningTask, TaskRegistry};
