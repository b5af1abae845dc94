//! Candidate scoring strategies.
//!
//! - [`ValueScorer`]: pointwise. One oracle call per unique candidate, memoized
//!   in the shared [`ScoreCache`] keyed by the rendered value prompt.
//! - [`VoteScorer`]: comparative. One oracle call per step returns
//!   `n_evaluate_sample` ballots over the whole batch.
//!
//! Scoring never catches oracle failures; they surface to the search.

use crate::ports::oracle::{Oracle, OracleError};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tq_domain::{EvaluationMethod, ReasoningTask, ScoreCache, SearchParams};
use tracing::debug;

/// Pointwise value estimation with a read-through cache
pub struct ValueScorer {
    oracle: Arc<dyn Oracle>,
    task: Arc<dyn ReasoningTask>,
    cache: Arc<ScoreCache>,
    n_evaluate_sample: usize,
    use_cache: bool,
    max_concurrency: usize,
}

impl ValueScorer {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        task: Arc<dyn ReasoningTask>,
        cache: Arc<ScoreCache>,
        params: &SearchParams,
    ) -> Self {
        Self {
            oracle,
            task,
            cache,
            n_evaluate_sample: params.n_evaluate_sample,
            use_cache: params.cache_value,
            max_concurrency: params.max_concurrency.max(1),
        }
    }

    /// Score a single candidate
    pub async fn score(&self, problem: &str, candidate: &str) -> Result<f64, OracleError> {
        let prompt = self.task.value_prompt(problem, candidate);
        if self.use_cache
            && let Some(value) = self.cache.get(&prompt)
        {
            return Ok(value);
        }

        let outputs = self
            .oracle
            .complete(&prompt, self.n_evaluate_sample, None)
            .await?;
        let value = self.task.unwrap_value_outputs(problem, candidate, &outputs);

        if self.use_cache {
            self.cache.insert(prompt, value);
        }
        Ok(value)
    }

    /// Score a batch, zeroing later duplicates of a candidate text.
    ///
    /// Unique candidates are scored with at most `max_concurrency` calls in
    /// flight; scores come back in candidate order.
    pub async fn score_all(
        &self,
        problem: &str,
        candidates: &[String],
    ) -> Result<Vec<f64>, OracleError> {
        let mut seen = HashSet::new();
        let first_seen: Vec<bool> = candidates
            .iter()
            .map(|c| seen.insert(c.as_str()))
            .collect();

        // Futures are built up front so the buffered stream owns no closures
        let mut pending = Vec::with_capacity(seen.len());
        for (candidate, first) in candidates.iter().zip(&first_seen) {
            if *first {
                pending.push(self.score(problem, candidate));
            }
        }
        let unique: Vec<f64> = stream::iter(pending)
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;

        let mut unique = unique.into_iter();
        let scores = first_seen
            .iter()
            .map(|first| {
                if *first {
                    unique.next().unwrap_or(0.0)
                } else {
                    0.0
                }
            })
            .collect();

        debug!(
            "Value scores for {} candidates ({} unique)",
            candidates.len(),
            seen.len()
        );
        Ok(scores)
    }
}

/// Comparative voting over the whole candidate batch
pub struct VoteScorer {
    oracle: Arc<dyn Oracle>,
    task: Arc<dyn ReasoningTask>,
    n_evaluate_sample: usize,
}

impl VoteScorer {
    pub fn new(oracle: Arc<dyn Oracle>, task: Arc<dyn ReasoningTask>, params: &SearchParams) -> Self {
        Self {
            oracle,
            task,
            n_evaluate_sample: params.n_evaluate_sample,
        }
    }

    pub async fn score_all(
        &self,
        problem: &str,
        candidates: &[String],
    ) -> Result<Vec<f64>, OracleError> {
        let prompt = self.task.vote_prompt(problem, candidates);
        let ballots = self
            .oracle
            .complete(&prompt, self.n_evaluate_sample, None)
            .await?;
        Ok(self.task.unwrap_vote_outputs(&ballots, candidates.len()))
    }
}

/// Scorer chosen by [`EvaluationMethod`]
pub enum Scorer {
    Value(ValueScorer),
    Vote(VoteScorer),
}

impl Scorer {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        task: Arc<dyn ReasoningTask>,
        cache: Arc<ScoreCache>,
        params: &SearchParams,
    ) -> Self {
        match params.method_evaluate {
            EvaluationMethod::Value => Scorer::Value(ValueScorer::new(oracle, task, cache, params)),
            EvaluationMethod::Vote => Scorer::Vote(VoteScorer::new(oracle, task, params)),
        }
    }

    /// One score per candidate, in candidate order
    pub async fn score_all(
        &self,
        problem: &str,
        candidates: &[String],
    ) -> Result<Vec<f64>, OracleError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Scorer::Value(scorer) => scorer.score_all(problem, candidates).await,
            Scorer::Vote(scorer) => scorer.score_all(problem, candidates).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tq_domain::{Gsm8kTask, Model};

    // ==================== Test Mocks ====================

    /// Answers every call with the same completion, recording prompts
    struct FixedOracle {
        model: Model,
        completion: String,
        calls: AtomicUsize,
        prompts: Mutex<Vec<(String, usize)>>,
    }

    impl FixedOracle {
        fn new(completion: &str) -> Self {
            Self {
                model: Model::default(),
                completion: completion.to_string(),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Oracle for FixedOracle {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn complete(
            &self,
            prompt: &str,
            samples: usize,
            _stop: Option<&str>,
        ) -> Result<Vec<String>, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), samples));
            Ok(vec![self.completion.clone(); samples])
        }
    }

    fn value_params() -> SearchParams {
        SearchParams::default()
            .with_evaluation(EvaluationMethod::Value)
            .with_samples(1, 3, 1)
    }

    fn task() -> Arc<dyn ReasoningTask> {
        Arc::new(Gsm8kTask::new())
    }

    #[tokio::test]
    async fn test_value_cache_idempotence() {
        let oracle = Arc::new(FixedOracle::new("sure"));
        let cache = Arc::new(ScoreCache::new());
        let scorer = ValueScorer::new(oracle.clone(), task(), cache.clone(), &value_params());

        let first = scorer.score("2+2=?", "the answer is 4").await.unwrap();
        let second = scorer.score("2+2=?", "the answer is 4").await.unwrap();

        assert_eq!(oracle.calls(), 1);
        assert_eq!(first, second);
        assert_eq!(first, 60.0);
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_value_cache_disabled_calls_every_time() {
        let oracle = Arc::new(FixedOracle::new("likely"));
        let mut params = value_params();
        params.cache_value = false;
        let cache = Arc::new(ScoreCache::new());
        let scorer = ValueScorer::new(oracle.clone(), task(), cache.clone(), &params);

        scorer.score("q", "a").await.unwrap();
        scorer.score("q", "a").await.unwrap();

        assert_eq!(oracle.calls(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_value_dedupe_zeroes_repeats() {
        let oracle = Arc::new(FixedOracle::new("sure"));
        let mut params = value_params();
        params.cache_value = false;
        let scorer = ValueScorer::new(oracle.clone(), task(), Arc::new(ScoreCache::new()), &params);

        let candidates = vec!["a".to_string(), "a".to_string(), "b".to_string()];
        let scores = scorer.score_all("q", &candidates).await.unwrap();

        assert_eq!(scores.len(), 3);
        assert!(scores[0] > 0.0);
        assert_eq!(scores[1], 0.0);
        assert!(scores[2] > 0.0);
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_value_requests_n_evaluate_sample() {
        let oracle = Arc::new(FixedOracle::new("impossible"));
        let scorer = ValueScorer::new(
            oracle.clone(),
            task(),
            Arc::new(ScoreCache::new()),
            &value_params(),
        );

        scorer.score("q", "a").await.unwrap();
        assert_eq!(oracle.prompts.lock().unwrap()[0].1, 3);
    }

    #[tokio::test]
    async fn test_vote_single_call_for_batch() {
        let oracle = Arc::new(FixedOracle::new("Analysis... The best choice is 2"));
        let params = SearchParams::default().with_samples(1, 4, 1);
        let scorer = VoteScorer::new(oracle.clone(), task(), &params);

        let candidates = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let scores = scorer.score_all("q", &candidates).await.unwrap();

        assert_eq!(oracle.calls(), 1);
        assert_eq!(scores, vec![0.0, 4.0, 0.0]);
    }

    #[tokio::test]
    async fn test_vote_unparseable_ballots_score_zero() {
        let oracle = Arc::new(FixedOracle::new("no clear winner"));
        let scorer = VoteScorer::new(oracle, task(), &SearchParams::default());

        let candidates = vec!["x".to_string(), "y".to_string()];
        let scores = scorer.score_all("q", &candidates).await.unwrap();
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    /// Compiles only if the scoring future is `Send` for every borrow lifetime,
    /// as a boxed `#[async_trait]` future requires
    fn send_scoring<'a>(
        scorer: &'a Scorer,
        problem: &'a str,
        candidates: &'a [String],
    ) -> impl std::future::Future<Output = Result<Vec<f64>, OracleError>> + Send + 'a {
        scorer.score_all(problem, candidates)
    }

    #[tokio::test]
    async fn test_score_all_runs_as_send_future() {
        let oracle = Arc::new(FixedOracle::new("sure"));
        let mut params = value_params();
        params.cache_value = false;
        let scorer = Scorer::new(oracle.clone(), task(), Arc::new(ScoreCache::new()), &params);

        let candidates = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let scores = send_scoring(&scorer, "q", &candidates).await.unwrap();

        assert_eq!(scores, vec![60.0, 60.0, 0.0]);
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_scorer_skips_empty_batch() {
        let oracle = Arc::new(FixedOracle::new("The best choice is 1"));
        let scorer = Scorer::new(
            oracle.clone(),
            task(),
            Arc::new(ScoreCache::new()),
            &SearchParams::default(),
        );

        let scores = scorer.score_all("q", &[]).await.unwrap();
        assert!(scores.is_empty());
        assert_eq!(oracle.calls(), 0);
    }
}
