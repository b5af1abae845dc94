//! Run Benchmark use case
//!
//! Resolves a labelled problem set one problem at a time, checkpointing the
//! report through the [`ResultStore`] so an interrupted run resumes where it
//! stopped.

use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::result_store::{BenchmarkReport, ResultStore, StoreError};
use crate::use_cases::consensus::{ConsensusUseCase, ResolveError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use thiserror::Error;
use tq_domain::Problem;
use tracing::{info, warn};

/// Errors that can occur during a benchmark run
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Problem {id} failed: {source}")]
    Resolve {
        id: String,
        #[source]
        source: ResolveError,
    },

    #[error("Result store error: {0}")]
    Store(#[from] StoreError),
}

/// One labelled problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkItem {
    /// Positional id ("0", "1", …)
    pub id: String,
    pub problem: Problem,
    /// Expected answer, compared verbatim with the prediction
    pub label: String,
}

/// Input for the RunBenchmark use case
#[derive(Debug, Clone)]
pub struct RunBenchmarkInput {
    pub items: Vec<BenchmarkItem>,
    /// Run arguments echoed into the report
    pub args: serde_json::Value,
    /// Checkpoint after this many newly solved problems
    pub save_every: usize,
    /// Seed of the controller RNG shared by the whole run
    pub seed: u64,
}

impl RunBenchmarkInput {
    pub fn new(items: Vec<BenchmarkItem>, args: serde_json::Value) -> Self {
        Self {
            items,
            args,
            save_every: 10,
            seed: 10,
        }
    }

    pub fn with_save_every(mut self, save_every: usize) -> Self {
        self.save_every = save_every;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Use case for running consensus over a whole dataset
pub struct RunBenchmarkUseCase {
    consensus: Arc<ConsensusUseCase>,
    store: Arc<dyn ResultStore>,
}

impl RunBenchmarkUseCase {
    pub fn new(consensus: Arc<ConsensusUseCase>, store: Arc<dyn ResultStore>) -> Self {
        Self { consensus, store }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunBenchmarkInput) -> Result<BenchmarkReport, BenchmarkError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunBenchmarkInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<BenchmarkReport, BenchmarkError> {
        let total = input.items.len();
        let mut report = match self.store.load()? {
            Some(checkpoint) => {
                info!(
                    "Resuming from checkpoint: {}/{}, correct: {}, acc: {:.2}%",
                    checkpoint.results.len(),
                    total,
                    checkpoint.correct,
                    checkpoint.acc
                );
                checkpoint
            }
            None => BenchmarkReport::new(input.args.clone()),
        };

        let mut rng = StdRng::seed_from_u64(input.seed);
        let save_every = input.save_every.max(1);
        let mut solved = 0;

        for item in &input.items {
            if report.is_done(&item.id) {
                continue;
            }

            let resolution = self
                .consensus
                .execute_with_progress(&item.problem, &mut rng, progress)
                .await
                .map_err(|source| BenchmarkError::Resolve {
                    id: item.id.clone(),
                    source,
                })?;

            let correct = resolution.answer == item.label;
            if !correct {
                warn!(
                    "Problem {}: predicted {:?}, expected {:?}",
                    item.id, resolution.answer, item.label
                );
            }
            report.record(item.id.clone(), resolution.answer, resolution.history, correct);
            solved += 1;

            info!(
                "{}/{}, correct: {}, acc: {:.2}%",
                report.results.len(),
                total,
                report.correct,
                report.acc
            );
            progress.on_problem_complete(report.results.len(), total, report.correct);

            if solved % save_every == 0 {
                self.store.save(&report)?;
            }
        }

        self.store.save(&report)?;
        Ok(report)
    }
}
