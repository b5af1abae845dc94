//! Search policies and parameters.
//!
//! Each policy axis of the beam search is a closed enum parsed from its
//! configuration name. Parsing fails with a [`ConfigError`] on unknown names,
//! so a misconfigured run aborts before the oracle is ever called.
//!
//! | Axis | Variants | Config key |
//! |------|----------|------------|
//! | [`GenerationMethod`] | `sample`, `propose` | `method_generate` |
//! | [`EvaluationMethod`] | `value`, `vote` | `method_evaluate` |
//! | [`SelectionMethod`] | `greedy`, `sample` | `method_select` |
//! | [`PromptStyle`] | `standard`, `cot` | `prompt_sample` |

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How new thoughts are produced from each beam member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    /// `n_generate_sample` independent completions of one prompt
    #[default]
    Sample,
    /// One completion listing several next lines, split by newline
    Propose,
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMethod::Sample => write!(f, "sample"),
            GenerationMethod::Propose => write!(f, "propose"),
        }
    }
}

impl std::str::FromStr for GenerationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sample" => Ok(GenerationMethod::Sample),
            "propose" => Ok(GenerationMethod::Propose),
            _ => Err(ConfigError::UnknownGenerationMethod(s.to_string())),
        }
    }
}

/// How flattened candidates are scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMethod {
    /// Pointwise value estimate per candidate, cached by prompt
    Value,
    /// One batch vote over all candidates
    #[default]
    Vote,
}

impl fmt::Display for EvaluationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationMethod::Value => write!(f, "value"),
            EvaluationMethod::Vote => write!(f, "vote"),
        }
    }
}

impl std::str::FromStr for EvaluationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "value" => Ok(EvaluationMethod::Value),
            "vote" => Ok(EvaluationMethod::Vote),
            _ => Err(ConfigError::UnknownEvaluationMethod(s.to_string())),
        }
    }
}

/// How the scored candidates are reduced back to the beam width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    /// Top-k by score, stable on ties
    #[default]
    Greedy,
    /// Draw with replacement, proportional to score
    Sample,
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMethod::Greedy => write!(f, "greedy"),
            SelectionMethod::Sample => write!(f, "sample"),
        }
    }
}

impl std::str::FromStr for SelectionMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(SelectionMethod::Greedy),
            "sample" => Ok(SelectionMethod::Sample),
            _ => Err(ConfigError::UnknownSelectionMethod(s.to_string())),
        }
    }
}

/// Prompt template used by the sampling generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    Standard,
    /// Chain-of-thought
    #[default]
    Cot,
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptStyle::Standard => write!(f, "standard"),
            PromptStyle::Cot => write!(f, "cot"),
        }
    }
}

impl std::str::FromStr for PromptStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(PromptStyle::Standard),
            "cot" => Ok(PromptStyle::Cot),
            _ => Err(ConfigError::UnknownPromptStyle(s.to_string())),
        }
    }
}

/// Beam search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub method_generate: GenerationMethod,
    pub method_evaluate: EvaluationMethod,
    pub method_select: SelectionMethod,
    pub prompt_sample: PromptStyle,
    /// Completions requested per beam member when sampling
    pub n_generate_sample: usize,
    /// Oracle samples per evaluation (value repeats or vote ballots)
    pub n_evaluate_sample: usize,
    /// Beam width
    pub n_select_sample: usize,
    /// Read/write the shared score cache in value mode
    pub cache_value: bool,
    /// Upper bound on in-flight value-scoring calls within one step
    pub max_concurrency: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            method_generate: GenerationMethod::Sample,
            method_evaluate: EvaluationMethod::Vote,
            method_select: SelectionMethod::Greedy,
            prompt_sample: PromptStyle::Cot,
            n_generate_sample: 5,
            n_evaluate_sample: 5,
            n_select_sample: 1,
            cache_value: true,
            max_concurrency: 4,
        }
    }
}

impl SearchParams {
    pub fn with_generation(mut self, method: GenerationMethod) -> Self {
        self.method_generate = method;
        self
    }

    pub fn with_evaluation(mut self, method: EvaluationMethod) -> Self {
        self.method_evaluate = method;
        self
    }

    pub fn with_selection(mut self, method: SelectionMethod) -> Self {
        self.method_select = method;
        self
    }

    pub fn with_prompt_style(mut self, style: PromptStyle) -> Self {
        self.prompt_sample = style;
        self
    }

    pub fn with_samples(mut self, generate: usize, evaluate: usize, select: usize) -> Self {
        self.n_generate_sample = generate;
        self.n_evaluate_sample = evaluate;
        self.n_select_sample = select;
        self
    }

    /// Reject parameter combinations the search cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_generate_sample == 0 {
            return Err(ConfigError::invalid("n_generate_sample", "must be at least 1"));
        }
        if self.n_evaluate_sample == 0 {
            return Err(ConfigError::invalid("n_evaluate_sample", "must be at least 1"));
        }
        if self.n_select_sample == 0 {
            return Err(ConfigError::invalid("n_select_sample", "must be at least 1"));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::invalid("max_concurrency", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_methods() {
        assert_eq!("sample".parse(), Ok(GenerationMethod::Sample));
        assert_eq!("Propose".parse(), Ok(GenerationMethod::Propose));
        assert_eq!("value".parse(), Ok(EvaluationMethod::Value));
        assert_eq!("VOTE".parse(), Ok(EvaluationMethod::Vote));
        assert_eq!("greedy".parse(), Ok(SelectionMethod::Greedy));
        assert_eq!("sample".parse(), Ok(SelectionMethod::Sample));
        assert_eq!("cot".parse(), Ok(PromptStyle::Cot));
        assert_eq!("standard".parse(), Ok(PromptStyle::Standard));
    }

    #[test]
    fn test_unknown_names_are_config_errors() {
        assert_eq!(
            "beam".parse::<GenerationMethod>(),
            Err(ConfigError::UnknownGenerationMethod("beam".to_string()))
        );
        assert_eq!(
            "score".parse::<EvaluationMethod>(),
            Err(ConfigError::UnknownEvaluationMethod("score".to_string()))
        );
        assert_eq!(
            "top".parse::<SelectionMethod>(),
            Err(ConfigError::UnknownSelectionMethod("top".to_string()))
        );
        assert_eq!(
            "tot".parse::<PromptStyle>(),
            Err(ConfigError::UnknownPromptStyle("tot".to_string()))
        );
    }

    #[test]
    fn test_display_matches_parse() {
        for m in [GenerationMethod::Sample, GenerationMethod::Propose] {
            assert_eq!(m.to_string().parse(), Ok(m));
        }
        for m in [SelectionMethod::Greedy, SelectionMethod::Sample] {
            assert_eq!(m.to_string().parse(), Ok(m));
        }
    }

    #[test]
    fn test_default_params() {
        let params = SearchParams::default();
        assert_eq!(params.method_generate, GenerationMethod::Sample);
        assert_eq!(params.method_evaluate, EvaluationMethod::Vote);
        assert_eq!(params.method_select, SelectionMethod::Greedy);
        assert_eq!(params.n_generate_sample, 5);
        assert_eq!(params.n_select_sample, 1);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_beam() {
        let params = SearchParams::default().with_samples(5, 5, 0);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidParameter { name: "n_select_sample", .. })
        ));
    }
}
