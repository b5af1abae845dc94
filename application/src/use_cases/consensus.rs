//! Consensus use case
//!
//! Runs several independent reasoners per round, verifies each final thought
//! and stops as soon as enough verified answers agree:
//!
//! ```text
//! ROUND(k): reason ×N ─▶ extract answers ─▶ verify ×N ─▶ record
//!     agreement?  yes ─▶ done
//!                 no  ─▶ ROUND(k+1), or fallback after the last round
//! ```
//!
//! All randomness comes from the caller's RNG: per-reasoner seeds are drawn
//! before a round starts, so concurrent reasoners stay reproducible.

use crate::config::ConsensusParams;
use crate::ports::oracle::OracleError;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::verifier::Verifier;
use crate::use_cases::beam_search::SearchError;
use async_trait::async_trait;
use futures::future::try_join_all;
use rand::RngCore;
use rand::rngs::StdRng;
use std::sync::Arc;
use thiserror::Error;
use tq_domain::{
    ConsensusLedger, ConsensusOutcome, History, Problem, ReasonerOutcome, ReasoningTask,
    RoundRecord,
};
use tracing::{debug, info};

/// Errors that can occur while resolving a problem
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Verification failed: {0}")]
    Verification(OracleError),
}

/// Identity of one reasoner run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReasonerSlot {
    /// Round number (1-indexed)
    pub round: usize,
    /// Reasoner number within the round (1-indexed)
    pub reasoner: usize,
    /// Seed for this run's private RNG
    pub seed: u64,
}

/// What a reasoner hands back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reasoning {
    /// Final thought, submitted to the verifier in full
    pub thought: String,
    /// Human-readable search trace
    pub trace: String,
}

/// One independent reasoning run
#[async_trait]
pub trait Reasoner: Send + Sync {
    async fn reason(&self, problem: &str, slot: ReasonerSlot) -> Result<Reasoning, SearchError>;
}

/// Output of a resolve
#[derive(Debug, Clone)]
pub struct Resolution {
    pub answer: String,
    /// Full audit trail of every round
    pub history: String,
    pub outcome: ConsensusOutcome,
    pub ledger: ConsensusLedger,
}

impl Resolution {
    pub fn rounds(&self) -> usize {
        self.ledger.rounds().len()
    }
}

/// Use case for round-based multi-reasoner consensus
pub struct ConsensusUseCase {
    reasoner: Arc<dyn Reasoner>,
    verifier: Arc<dyn Verifier>,
    task: Arc<dyn ReasoningTask>,
    params: ConsensusParams,
}

impl ConsensusUseCase {
    pub fn new(
        reasoner: Arc<dyn Reasoner>,
        verifier: Arc<dyn Verifier>,
        task: Arc<dyn ReasoningTask>,
    ) -> Self {
        Self {
            reasoner,
            verifier,
            task,
            params: ConsensusParams::default(),
        }
    }

    pub fn with_params(mut self, params: ConsensusParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &ConsensusParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, problem: &Problem, rng: &mut StdRng) -> Result<Resolution, ResolveError> {
        self.execute_with_progress(problem, rng, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        problem: &Problem,
        rng: &mut StdRng,
        progress: &dyn ProgressNotifier,
    ) -> Result<Resolution, ResolveError> {
        let mut ledger = ConsensusLedger::new();
        let mut history =
            History::new().with_agreement_threshold(self.params.agreement_threshold);

        for round in 1..=self.params.max_rounds {
            info!("Consensus round {}/{}", round, self.params.max_rounds);
            progress.on_round_start(round, self.params.reasoners);

            let seeds: Vec<u64> = (0..self.params.reasoners).map(|_| rng.next_u64()).collect();
            let outcomes = try_join_all(seeds.into_iter().enumerate().map(|(i, seed)| {
                let slot = ReasonerSlot {
                    round,
                    reasoner: i + 1,
                    seed,
                };
                self.run_reasoner(problem.content(), slot, progress)
            }))
            .await?;

            let record = RoundRecord::new(round, outcomes);
            history.push_round(&record);
            ledger.record(record);

            if let Some(outcome) = ledger.agreement(self.params.agreement_threshold) {
                info!("Round {} reached agreement on {:?}", round, outcome.answer());
                progress.on_round_complete(round, Some(outcome.answer()));
                return Ok(Self::finish(outcome, history, ledger));
            }

            progress.on_round_complete(round, None);
            if round < self.params.max_rounds {
                history.push_no_agreement();
            }
        }

        let outcome = ledger.fallback(rng);
        info!(
            "No agreement after {} rounds: {} ({:?})",
            self.params.max_rounds,
            outcome,
            outcome.answer()
        );
        Ok(Self::finish(outcome, history, ledger))
    }

    fn finish(outcome: ConsensusOutcome, mut history: History, ledger: ConsensusLedger) -> Resolution {
        history.push_outcome(&outcome);
        Resolution {
            answer: outcome.answer().to_string(),
            history: history.into_string(),
            outcome,
            ledger,
        }
    }

    async fn run_reasoner(
        &self,
        problem: &str,
        slot: ReasonerSlot,
        progress: &dyn ProgressNotifier,
    ) -> Result<ReasonerOutcome, ResolveError> {
        let reasoning = self.reasoner.reason(problem, slot).await?;
        let answer = self.task.extract_answer(&reasoning.thought);

        let verdict = self
            .verifier
            .judge(&reasoning.thought, problem)
            .await
            .map_err(ResolveError::Verification)?;
        debug!(
            "Round {} reasoner {}: answer {:?}, verified {}",
            slot.round, slot.reasoner, answer, verdict.valid
        );
        progress.on_reasoner_complete(slot.round, slot.reasoner, &answer, verdict.valid);

        Ok(ReasonerOutcome {
            reasoner: slot.reasoner,
            reasoning: reasoning.thought,
            trace: reasoning.trace,
            answer,
            verified: verdict.valid,
            rationale: verdict.rationale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::oracle::Oracle;
    use crate::ports::verifier::Verdict;
    use crate::use_cases::beam_search::BeamSearchUseCase;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tq_domain::{Gsm8kTask, Model, SearchParams, tally_votes};

    // ==================== Test Mocks ====================

    /// Returns "the answer is X" per (round, reasoner); unscripted slots answer nothing
    struct ScriptedReasoner {
        answers: HashMap<(usize, usize), &'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedReasoner {
        fn new(rounds: &[&[&'static str]]) -> Self {
            let mut answers = HashMap::new();
            for (r, round) in rounds.iter().enumerate() {
                for (i, answer) in round.iter().enumerate() {
                    answers.insert((r + 1, i + 1), *answer);
                }
            }
            Self {
                answers,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Reasoner for ScriptedReasoner {
        async fn reason(&self, _problem: &str, slot: ReasonerSlot) -> Result<Reasoning, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let answer = self
                .answers
                .get(&(slot.round, slot.reasoner))
                .copied()
                .unwrap_or_default();
            Ok(Reasoning {
                thought: format!("r{}-{}: the answer is {}", slot.round, slot.reasoner, answer),
                trace: format!("trace {}-{}", slot.round, slot.reasoner),
            })
        }
    }

    /// Accepts only thoughts from the listed (round, reasoner) slots
    struct SlotVerifier {
        accepted: Option<HashSet<String>>,
        calls: AtomicUsize,
    }

    impl SlotVerifier {
        fn accept_all() -> Self {
            Self {
                accepted: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn accepting(slots: &[(usize, usize)]) -> Self {
            Self {
                accepted: Some(slots.iter().map(|(r, i)| format!("r{}-{}:", r, i)).collect()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Verifier for SlotVerifier {
        async fn judge(&self, reasoning: &str, _problem: &str) -> Result<Verdict, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let valid = match &self.accepted {
                None => true,
                Some(accepted) => accepted.iter().any(|prefix| reasoning.starts_with(prefix)),
            };
            let rationale = if valid {
                "Reasoning is Valid"
            } else {
                "Reasoning is Invalid"
            };
            Ok(Verdict::new(valid, rationale))
        }
    }

    struct FailingVerifier;

    #[async_trait]
    impl Verifier for FailingVerifier {
        async fn judge(&self, _reasoning: &str, _problem: &str) -> Result<Verdict, OracleError> {
            Err(OracleError::Timeout)
        }
    }

    #[derive(Default)]
    struct RoundCounter {
        started: Mutex<Vec<usize>>,
        reasoners: AtomicUsize,
    }

    impl ProgressNotifier for RoundCounter {
        fn on_round_start(&self, round: usize, _reasoners: usize) {
            self.started.lock().unwrap().push(round);
        }

        fn on_reasoner_complete(&self, _round: usize, _reasoner: usize, _answer: &str, _verified: bool) {
            self.reasoners.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn use_case(reasoner: Arc<dyn Reasoner>, verifier: Arc<dyn Verifier>) -> ConsensusUseCase {
        ConsensusUseCase::new(reasoner, verifier, Arc::new(Gsm8kTask::new()))
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    // ==================== Agreement ====================

    #[tokio::test]
    async fn test_agreement_in_first_round() {
        let reasoner = Arc::new(ScriptedReasoner::new(&[&["42", "42", "17"]]));
        let verifier = Arc::new(SlotVerifier::accept_all());
        let progress = RoundCounter::default();

        let resolution = use_case(reasoner.clone(), verifier.clone())
            .execute_with_progress(&Problem::new("q"), &mut rng(10), &progress)
            .await
            .unwrap();

        assert_eq!(resolution.answer, "42");
        assert_eq!(
            resolution.outcome,
            ConsensusOutcome::Agreed {
                answer: "42".to_string(),
                round: 1
            }
        );
        assert_eq!(resolution.rounds(), 1);
        assert_eq!(reasoner.calls.load(Ordering::SeqCst), 3);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 3);
        assert_eq!(*progress.started.lock().unwrap(), vec![1]);
        assert_eq!(progress.reasoners.load(Ordering::SeqCst), 3);
        assert!(resolution.history.contains(" ########## Round 1 ########## "));
        assert!(resolution.history.contains("Final Answer: 42"));
        assert!(!resolution.history.contains("Round 2"));
    }

    #[tokio::test]
    async fn test_history_quotes_configured_threshold() {
        let reasoner = Arc::new(ScriptedReasoner::new(&[&["9", "9", "9"]]));
        let verifier = Arc::new(SlotVerifier::accept_all());

        let resolution = use_case(reasoner, verifier)
            .with_params(ConsensusParams::default().with_agreement_threshold(3))
            .execute(&Problem::new("q"), &mut rng(10))
            .await
            .unwrap();

        assert_eq!(resolution.answer, "9");
        assert!(
            resolution
                .history
                .contains("At least three verified reasoners agree. Final Answer: 9")
        );
    }

    #[tokio::test]
    async fn test_unverified_agreement_does_not_count() {
        let reasoner = Arc::new(ScriptedReasoner::new(&[
            &["42", "42", "17"],
            &["8", "8", "1"],
        ]));
        // round 1: only one 42 verified; round 2: both 8s verified
        let verifier = Arc::new(SlotVerifier::accepting(&[(1, 1), (2, 1), (2, 2)]));

        let resolution = use_case(reasoner, verifier)
            .execute(&Problem::new("q"), &mut rng(10))
            .await
            .unwrap();

        assert_eq!(resolution.answer, "8");
        assert_eq!(resolution.rounds(), 2);
        assert!(
            resolution
                .history
                .contains("No agreement among verified answers. Continuing to next round.")
        );
    }

    // ==================== Fallback ====================

    #[tokio::test]
    async fn test_fallback_most_frequent_verified() {
        let reasoner = Arc::new(ScriptedReasoner::new(&[
            &["7", "1", "2"],
            &["7", "9", "3"],
            &["4", "5", "6"],
        ]));
        let verifier = Arc::new(SlotVerifier::accepting(&[(1, 1), (2, 1), (2, 2)]));

        let resolution = use_case(reasoner.clone(), verifier)
            .execute(&Problem::new("q"), &mut rng(10))
            .await
            .unwrap();

        assert_eq!(resolution.answer, "7");
        assert_eq!(
            resolution.outcome,
            ConsensusOutcome::MostFrequentVerified {
                answer: "7".to_string()
            }
        );
        assert_eq!(resolution.rounds(), 3);
        assert_eq!(reasoner.calls.load(Ordering::SeqCst), 9);
        assert_eq!(resolution.ledger.verified().total(), 3);
    }

    #[tokio::test]
    async fn test_fallback_tie_covers_both_answers() {
        let mut seen = HashSet::new();
        for seed in 0..64 {
            // nothing verified; all answers {"3":2, "5":2}
            let reasoner = Arc::new(ScriptedReasoner::new(&[&["3", "5"], &["3", "5"]]));
            let verifier = Arc::new(SlotVerifier::accepting(&[]));
            let params = ConsensusParams::default()
                .with_reasoners(2)
                .with_max_rounds(2);
            let resolution = use_case(reasoner, verifier)
                .with_params(params)
                .execute(&Problem::new("q"), &mut rng(seed))
                .await
                .unwrap();
            assert!(matches!(
                resolution.outcome,
                ConsensusOutcome::RandomTieBreak { .. }
            ));
            seen.insert(resolution.answer);
        }
        assert_eq!(seen, HashSet::from(["3".to_string(), "5".to_string()]));
    }

    #[tokio::test]
    async fn test_fallback_most_frequent_overall() {
        let reasoner = Arc::new(ScriptedReasoner::new(&[&["3", "3"], &["5", "3"]]));
        let verifier = Arc::new(SlotVerifier::accepting(&[]));
        let params = ConsensusParams::default()
            .with_reasoners(2)
            .with_max_rounds(2);

        let resolution = use_case(reasoner, verifier)
            .with_params(params)
            .execute(&Problem::new("q"), &mut rng(1))
            .await
            .unwrap();

        assert_eq!(
            resolution.outcome,
            ConsensusOutcome::MostFrequentOverall {
                answer: "3".to_string()
            }
        );
        assert!(resolution.history.contains("No verified answers."));
    }

    // ==================== Reproducibility & Errors ====================

    /// Reasoner whose answer is derived from its seed
    struct SeedReasoner;

    #[async_trait]
    impl Reasoner for SeedReasoner {
        async fn reason(&self, _problem: &str, slot: ReasonerSlot) -> Result<Reasoning, SearchError> {
            Ok(Reasoning {
                thought: format!("the answer is {}", slot.seed % 1000),
                trace: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_history() {
        let run = |seed| async move {
            use_case(Arc::new(SeedReasoner), Arc::new(SlotVerifier::accepting(&[])))
                .execute(&Problem::new("q"), &mut rng(seed))
                .await
                .unwrap()
        };

        let a = run(10).await;
        let b = run(10).await;
        assert_eq!(a.history, b.history);
        assert_eq!(a.answer, b.answer);
    }

    #[tokio::test]
    async fn test_verifier_error_propagates() {
        let reasoner = Arc::new(ScriptedReasoner::new(&[&["1", "1", "1"]]));
        let err = use_case(reasoner, Arc::new(FailingVerifier))
            .execute(&Problem::new("q"), &mut rng(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Verification(OracleError::Timeout)
        ));
    }

    // ==================== End to end ====================

    /// One-step task with recognizable prompts
    struct EchoTask;

    impl ReasoningTask for EchoTask {
        fn name(&self) -> &str {
            "echo"
        }

        fn steps(&self) -> usize {
            1
        }

        fn stop(&self, _step: usize) -> Option<&str> {
            None
        }

        fn standard_prompt(&self, problem: &str, partial: &str) -> String {
            format!("GENERATE {}{}", problem, partial)
        }

        fn cot_prompt(&self, problem: &str, partial: &str) -> String {
            self.standard_prompt(problem, partial)
        }

        fn propose_prompt(&self, problem: &str, partial: &str) -> String {
            self.standard_prompt(problem, partial)
        }

        fn value_prompt(&self, problem: &str, partial: &str) -> String {
            format!("VALUE {} {}", problem, partial)
        }

        fn unwrap_value_outputs(&self, _problem: &str, _partial: &str, outputs: &[String]) -> f64 {
            outputs.len() as f64
        }

        fn vote_prompt(&self, problem: &str, _candidates: &[String]) -> String {
            format!("VOTE {}", problem)
        }

        fn unwrap_vote_outputs(&self, outputs: &[String], n_candidates: usize) -> Vec<f64> {
            tally_votes(outputs, n_candidates)
        }

        fn extract_answer(&self, trace: &str) -> String {
            Gsm8kTask::new().extract_answer(trace)
        }
    }

    struct ProposeFourOracle {
        model: Model,
        generations: AtomicUsize,
    }

    #[async_trait]
    impl Oracle for ProposeFourOracle {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn complete(
            &self,
            prompt: &str,
            samples: usize,
            _stop: Option<&str>,
        ) -> Result<Vec<String>, OracleError> {
            if prompt.starts_with("GENERATE") {
                self.generations.fetch_add(1, Ordering::SeqCst);
            }
            Ok(vec!["the answer is 4".to_string(); samples])
        }
    }

    #[tokio::test]
    async fn test_end_to_end_two_plus_two() {
        let oracle = Arc::new(ProposeFourOracle {
            model: Model::default(),
            generations: AtomicUsize::new(0),
        });
        let task: Arc<dyn ReasoningTask> = Arc::new(EchoTask);
        let params = SearchParams::default().with_samples(1, 1, 1);
        let search = Arc::new(BeamSearchUseCase::new(oracle.clone(), Arc::clone(&task), params));
        let verifier = Arc::new(SlotVerifier::accept_all());

        let resolution = ConsensusUseCase::new(search, verifier.clone(), task)
            .execute(&Problem::new("2+2=?"), &mut rng(10))
            .await
            .unwrap();

        assert_eq!(resolution.answer, "4");
        assert_eq!(resolution.rounds(), 1);
        assert_eq!(oracle.generations.load(Ordering::SeqCst), 3);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 3);
        assert!(resolution.history.contains("Starting reasoning process for question: 2+2=?"));
    }
}
