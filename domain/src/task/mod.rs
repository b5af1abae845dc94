//! Reasoning task capability.
//!
//! A task supplies everything domain-specific about a problem family: how
//! prompts are rendered, how raw oracle outputs become scores, and how a
//! final answer is pulled out of a reasoning trace. The search and consensus
//! machinery only ever talks to a task through [`ReasoningTask`].
//!
//! Prompt rendering must be a pure function of its inputs: value prompts
//! double as score-cache keys.

mod gsm8k;
mod registry;

pub use gsm8k::Gsm8kTask;
pub use registry::TaskRegistry;

use crate::search::PromptStyle;

/// Capability interface implemented once per problem domain
pub trait ReasoningTask: Send + Sync {
    /// Registry name (e.g. "gsm8k")
    fn name(&self) -> &str;

    /// Number of search steps
    fn steps(&self) -> usize;

    /// Stop sequence for the sampling generator at `step` (0-indexed)
    fn stop(&self, step: usize) -> Option<&str>;

    fn standard_prompt(&self, problem: &str, partial: &str) -> String;

    fn cot_prompt(&self, problem: &str, partial: &str) -> String;

    fn propose_prompt(&self, problem: &str, partial: &str) -> String;

    fn value_prompt(&self, problem: &str, partial: &str) -> String;

    /// Reduce `n_evaluate_sample` raw value outputs to one score
    fn unwrap_value_outputs(&self, problem: &str, partial: &str, outputs: &[String]) -> f64;

    fn vote_prompt(&self, problem: &str, candidates: &[String]) -> String;

    /// Turn raw vote ballots into one score per candidate
    fn unwrap_vote_outputs(&self, outputs: &[String], n_candidates: usize) -> Vec<f64>;

    /// Normalized answer token, or "" when none is found
    fn extract_answer(&self, trace: &str) -> String;

    /// Sampling-generation prompt for the configured style
    fn generation_prompt(&self, style: PromptStyle, problem: &str, partial: &str) -> String {
        match style {
            PromptStyle::Standard => self.standard_prompt(problem, partial),
            PromptStyle::Cot => self.cot_prompt(problem, partial),
        }
    }
}
