//! Quorum Consensus types
//!
//! Round records, the cumulative ledger across rounds, and the terminal
//! decision. The controller that drives oracle calls lives in the
//! application layer; everything here is deterministic given an RNG.
//!
//! # Decision procedure
//!
//! ```text
//! ROUND(k) ── ≥ threshold identical verified answers ──▶ TERMINAL(Agreed)
//!    │
//!    └── no agreement, k < max ──▶ ROUND(k+1)
//!    └── no agreement, k = max ──▶ TERMINAL(fallback)
//!
//! fallback: verified multiset non-empty ──▶ most frequent verified
//!           else top-two counts tied   ──▶ uniform draw from all answers
//!           else                       ──▶ most frequent of all answers
//! ```

use super::vote::AnswerTally;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Result of one reasoner within a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonerOutcome {
    /// Reasoner number (1-indexed)
    pub reasoner: usize,
    /// Final thought text submitted to the verifier
    pub reasoning: String,
    /// Rendered search trace
    pub trace: String,
    /// Extracted answer ("" when extraction failed)
    pub answer: String,
    /// Verifier verdict
    pub verified: bool,
    /// Verifier free-text rationale
    pub rationale: String,
}

/// A single consensus round
///
/// Outcomes are stored by reasoner number, never by arrival order.
///
/// # Example
///
/// ```
/// use tq_domain::quorum::{ReasonerOutcome, RoundRecord};
///
/// let outcome = |i: usize, answer: &str| ReasonerOutcome {
///     reasoner: i,
///     reasoning: String::new(),
///     trace: String::new(),
///     answer: answer.to_string(),
///     verified: true,
///     rationale: "Reasoning is valid".to_string(),
/// };
///
/// let round = RoundRecord::new(1, vec![outcome(1, "42"), outcome(2, "42"), outcome(3, "17")]);
/// assert_eq!(round.agreed_answer(2), Some("42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number (1-indexed)
    pub round: usize,
    pub outcomes: Vec<ReasonerOutcome>,
}

impl RoundRecord {
    pub fn new(round: usize, mut outcomes: Vec<ReasonerOutcome>) -> Self {
        outcomes.sort_by_key(|o| o.reasoner);
        Self { round, outcomes }
    }

    /// Every extracted answer, in reasoner order
    pub fn answers(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().map(|o| o.answer.as_str())
    }

    /// Answers whose reasoning passed verification, in reasoner order
    pub fn verified_answers(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.verified)
            .map(|o| o.answer.as_str())
    }

    pub fn verified_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.verified).count()
    }

    /// First verified answer shared by at least `threshold` reasoners
    pub fn agreed_answer(&self, threshold: usize) -> Option<&str> {
        let tally: AnswerTally = self.verified_answers().collect();
        let agreed = tally.reaching(threshold).next()?;
        self.verified_answers().find(|a| *a == agreed)
    }
}

/// How the final answer was decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsensusOutcome {
    /// Enough verified reasoners agreed within a round
    Agreed { answer: String, round: usize },
    /// Rounds exhausted; most frequent verified answer
    MostFrequentVerified { answer: String },
    /// Rounds exhausted, nothing verified; clear winner among all answers
    MostFrequentOverall { answer: String },
    /// Rounds exhausted, nothing verified, top counts tied; random draw
    RandomTieBreak { answer: String },
}

impl ConsensusOutcome {
    pub fn answer(&self) -> &str {
        match self {
            ConsensusOutcome::Agreed { answer, .. }
            | ConsensusOutcome::MostFrequentVerified { answer }
            | ConsensusOutcome::MostFrequentOverall { answer }
            | ConsensusOutcome::RandomTieBreak { answer } => answer,
        }
    }

    pub fn into_answer(self) -> String {
        match self {
            ConsensusOutcome::Agreed { answer, .. }
            | ConsensusOutcome::MostFrequentVerified { answer }
            | ConsensusOutcome::MostFrequentOverall { answer }
            | ConsensusOutcome::RandomTieBreak { answer } => answer,
        }
    }

    /// Check if the answer came from in-round agreement
    pub fn is_agreed(&self) -> bool {
        matches!(self, ConsensusOutcome::Agreed { .. })
    }
}

impl std::fmt::Display for ConsensusOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusOutcome::Agreed { round, .. } => write!(f, "Agreed in round {}", round),
            ConsensusOutcome::MostFrequentVerified { .. } => write!(f, "Most frequent verified"),
            ConsensusOutcome::MostFrequentOverall { .. } => write!(f, "Most frequent overall"),
            ConsensusOutcome::RandomTieBreak { .. } => write!(f, "Random tie-break"),
        }
    }
}

/// Cumulative state of a consensus run.
///
/// Rounds are append-only; both multisets only grow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsensusLedger {
    rounds: Vec<RoundRecord>,
    verified: AnswerTally,
    all: AnswerTally,
}

impl ConsensusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a round and fold its answers into both multisets
    pub fn record(&mut self, round: RoundRecord) {
        self.all.extend(round.answers());
        self.verified.extend(round.verified_answers());
        self.rounds.push(round);
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn verified(&self) -> &AnswerTally {
        &self.verified
    }

    pub fn all_answers(&self) -> &AnswerTally {
        &self.all
    }

    /// Agreement check on the most recent round
    pub fn agreement(&self, threshold: usize) -> Option<ConsensusOutcome> {
        let last = self.rounds.last()?;
        last.agreed_answer(threshold)
            .map(|answer| ConsensusOutcome::Agreed {
                answer: answer.to_string(),
                round: last.round,
            })
    }

    /// Terminal decision once the round budget is exhausted
    pub fn fallback<R: Rng + ?Sized>(&self, rng: &mut R) -> ConsensusOutcome {
        if let Some(answer) = self.verified.most_frequent() {
            return ConsensusOutcome::MostFrequentVerified {
                answer: answer.to_string(),
            };
        }

        if self.all.top_two_tied() {
            let index = rng.gen_range(0..self.all.total());
            let answer = self.all.nth_occurrence(index).unwrap_or_default();
            return ConsensusOutcome::RandomTieBreak {
                answer: answer.to_string(),
            };
        }

        ConsensusOutcome::MostFrequentOverall {
            answer: self.all.most_frequent().unwrap_or_default().to_string(),
        }
    }
}
