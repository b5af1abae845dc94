//! Quorum consensus domain
//!
//! Several independent reasoners solve the same problem; a verifier judges
//! each final reasoning; verified answers are reconciled by frequency voting
//! over a bounded number of rounds.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Round k                                                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Reasoner 1 ─┐                                                  │
//! │  Reasoner 2 ─┼─▶ answers ─▶ Verifier ─▶ RoundRecord             │
//! │  Reasoner 3 ─┘                              │                   │
//! │                                             ▼                   │
//! │                 ConsensusLedger (verified / all-answer tallies) │
//! │                                             │                   │
//! │                 agreement? ── yes ──▶ ConsensusOutcome::Agreed  │
//! │                     │                                           │
//! │                     no ──▶ next round, or fallback after last   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod consensus;
pub mod history;
pub mod parsing;
pub mod vote;

// Re-export main types
pub use consensus::{ConsensusLedger, ConsensusOutcome, ReasonerOutcome, RoundRecord};
pub use history::History;
pub use parsing::{parse_verification, parse_vote_choice, tally_votes};
pub use vote::AnswerTally;
