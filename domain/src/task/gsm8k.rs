//! GSM8K grade-school math task

use super::ReasoningTask;
use crate::prompt::Gsm8kTemplate;
use crate::quorum::parsing::tally_votes;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static ANSWER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)the answer is[^\d]*(\d+[\d,]*)").expect("answer pattern is a valid regex")
});

const STRATEGY_MARKER: &str = "Strategy:";

/// Value of each evaluation verdict word
const VALUE_SURE: f64 = 20.0;
const VALUE_LIKELY: f64 = 1.0;
const VALUE_IMPOSSIBLE: f64 = 0.001;

/// GSM8K: free-text math word problems with a single numeric answer
#[derive(Debug, Clone)]
pub struct Gsm8kTask {
    steps: usize,
    stops: Vec<Option<String>>,
}

impl Gsm8kTask {
    pub const NAME: &'static str = "gsm8k";

    pub fn new() -> Self {
        Self {
            steps: 2,
            stops: vec![Some("\nPassage:\n".to_string()), None],
        }
    }

    /// Override the number of search steps
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    fn find_answer(text: &str) -> Option<String> {
        ANSWER_PATTERN
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().replace(',', ""))
    }

    fn verdict_value(output: &str) -> f64 {
        let last_line = output
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or_default();
        let word = last_line
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        match word.as_str() {
            "sure" => VALUE_SURE,
            "likely" => VALUE_LIKELY,
            "impossible" => VALUE_IMPOSSIBLE,
            _ => 0.0,
        }
    }
}

impl Default for Gsm8kTask {
    fn default() -> Self {
        Self::new()
    }
}

impl ReasoningTask for Gsm8kTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn steps(&self) -> usize {
        self.steps
    }

    fn stop(&self, step: usize) -> Option<&str> {
        self.stops.get(step).and_then(|s| s.as_deref())
    }

    fn standard_prompt(&self, problem: &str, partial: &str) -> String {
        format!("{}{}", Gsm8kTemplate::standard(problem), partial)
    }

    fn cot_prompt(&self, problem: &str, partial: &str) -> String {
        if partial.is_empty() {
            Gsm8kTemplate::cot(problem)
        } else {
            format!(
                "{}{}{}",
                Gsm8kTemplate::cot(problem),
                partial,
                Gsm8kTemplate::continuation()
            )
        }
    }

    fn propose_prompt(&self, problem: &str, partial: &str) -> String {
        Gsm8kTemplate::propose(problem, partial)
    }

    fn value_prompt(&self, problem: &str, partial: &str) -> String {
        Gsm8kTemplate::value(problem, partial)
    }

    fn unwrap_value_outputs(&self, _problem: &str, _partial: &str, outputs: &[String]) -> f64 {
        outputs.iter().map(|o| Self::verdict_value(o)).sum()
    }

    fn vote_prompt(&self, problem: &str, candidates: &[String]) -> String {
        Gsm8kTemplate::vote(problem, candidates)
    }

    fn unwrap_vote_outputs(&self, outputs: &[String], n_candidates: usize) -> Vec<f64> {
        tally_votes(outputs, n_candidates)
    }

    /// Extract the number following "the answer is".
    ///
    /// With two or more `Strategy:` sections the search starts at the second
    /// one and falls back to the text before it.
    fn extract_answer(&self, trace: &str) -> String {
        let markers: Vec<usize> = trace
            .match_indices(STRATEGY_MARKER)
            .map(|(i, _)| i)
            .collect();

        let answer = match markers.get(1) {
            Some(&second) => Self::find_answer(&trace[second..])
                .or_else(|| Self::find_answer(&trace[..second])),
            None => Self::find_answer(trace),
        };

        if answer.is_none() {
            debug!("No answer found in trace of {} bytes", trace.len());
        }
        answer.unwrap_or_default()
    }
}
