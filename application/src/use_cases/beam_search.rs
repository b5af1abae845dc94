//! Beam Search use case
//!
//! Expands a beam of partial solutions over the task's fixed number of
//! steps:
//!
//! ```text
//! beam ──▶ Generate (sample | propose) ──▶ flattened candidates
//!                                              │
//!           next beam ◀── Select (greedy | sample) ◀── Evaluate (value | vote)
//! ```
//!
//! Each step replaces the beam wholesale and appends a [`StepRecord`] to the
//! trace. Oracle failures are not caught here.

use crate::ports::oracle::{Oracle, OracleError};
use crate::use_cases::consensus::{Reasoner, Reasoning, ReasonerSlot};
use crate::use_cases::scoring::Scorer;
use async_trait::async_trait;
use futures::future::try_join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use thiserror::Error;
use tq_domain::search::select;
use tq_domain::{
    Beam, GenerationMethod, ReasoningTask, ScoreCache, SearchParams, SearchTrace, StepRecord,
    Thought,
};
use tracing::{debug, info};

/// Errors that can occur during a beam search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
}

/// Result of one search
#[derive(Debug, Clone)]
pub struct SearchOutput {
    pub beam: Beam,
    pub trace: SearchTrace,
}

impl SearchOutput {
    /// Text of the best final thought, empty when the beam is empty
    pub fn best_thought(&self) -> String {
        self.beam.first().map(Thought::text).unwrap_or_default()
    }
}

/// Use case for one fixed-depth beam search
pub struct BeamSearchUseCase {
    oracle: Arc<dyn Oracle>,
    task: Arc<dyn ReasoningTask>,
    params: SearchParams,
    cache: Arc<ScoreCache>,
}

impl BeamSearchUseCase {
    pub fn new(oracle: Arc<dyn Oracle>, task: Arc<dyn ReasoningTask>, params: SearchParams) -> Self {
        Self {
            oracle,
            task,
            params,
            cache: Arc::new(ScoreCache::new()),
        }
    }

    /// Share a score cache with other searches over the same task
    pub fn with_cache(mut self, cache: Arc<ScoreCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<ScoreCache> {
        &self.cache
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Run the search, drawing selection randomness from `rng`
    pub async fn search(&self, problem: &str, rng: &mut StdRng) -> Result<SearchOutput, SearchError> {
        let scorer = Scorer::new(
            Arc::clone(&self.oracle),
            Arc::clone(&self.task),
            Arc::clone(&self.cache),
            &self.params,
        );
        let mut beam = Beam::initial();
        let mut trace = SearchTrace::new(problem);

        for step in 0..self.task.steps() {
            let candidates = self.generate(problem, &beam, step).await?;
            let texts: Vec<String> = candidates.iter().map(Thought::text).collect();

            let scores = scorer.score_all(problem, &texts).await?;

            let selected_ids = select(
                self.params.method_select,
                &scores,
                self.params.n_select_sample,
                rng,
            );
            debug!(
                "Step {}: {} candidates, selected {:?}",
                step + 1,
                candidates.len(),
                selected_ids
            );

            let next: Vec<Thought> = selected_ids.iter().map(|&i| candidates[i].clone()).collect();
            beam = Beam::from_thoughts(next);

            trace.push_step(StepRecord {
                step: step + 1,
                generation: self.params.method_generate,
                evaluation: self.params.method_evaluate,
                candidates: texts,
                scores,
                selected_ids,
                selected: beam.texts(),
            });
        }

        trace.finish(beam.texts());
        Ok(SearchOutput { beam, trace })
    }

    /// Fan out every beam member and flatten the children
    async fn generate(
        &self,
        problem: &str,
        beam: &Beam,
        step: usize,
    ) -> Result<Vec<Thought>, OracleError> {
        let fan_outs = try_join_all(beam.thoughts().iter().map(|thought| async move {
            match self.params.method_generate {
                GenerationMethod::Sample => self.sample(problem, thought, step).await,
                GenerationMethod::Propose => self.propose(problem, thought).await,
            }
        }))
        .await?;

        Ok(fan_outs.into_iter().flatten().collect())
    }

    /// `n_generate_sample` independent completions, each appended to `thought`
    async fn sample(
        &self,
        problem: &str,
        thought: &Thought,
        step: usize,
    ) -> Result<Vec<Thought>, OracleError> {
        let prompt = self
            .task
            .generation_prompt(self.params.prompt_sample, problem, &thought.text());
        let completions = self
            .oracle
            .complete(&prompt, self.params.n_generate_sample, self.task.stop(step))
            .await?;

        Ok(completions.into_iter().map(|c| thought.extend(c)).collect())
    }

    /// One call listing next lines; each non-blank line becomes a child
    async fn propose(&self, problem: &str, thought: &Thought) -> Result<Vec<Thought>, OracleError> {
        let prompt = self.task.propose_prompt(problem, &thought.text());
        let response = self
            .oracle
            .complete(&prompt, 1, None)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();

        Ok(response
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| thought.extend(format!("{}\n", line)))
            .collect())
    }
}

#[async_trait]
impl Reasoner for BeamSearchUseCase {
    async fn reason(&self, problem: &str, slot: ReasonerSlot) -> Result<Reasoning, SearchError> {
        info!(
            "Round {} reasoner {} searching ({} steps)",
            slot.round,
            slot.reasoner,
            self.task.steps()
        );
        let mut rng = StdRng::seed_from_u64(slot.seed);
        let output = self.search(problem, &mut rng).await?;
        Ok(Reasoning {
            thought: output.best_thought(),
            trace: output.trace.render(),
        })
    }
}
