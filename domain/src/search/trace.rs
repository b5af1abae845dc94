//! Search trace: the per-step audit log of one beam search

use super::params::{EvaluationMethod, GenerationMethod};
use serde::{Deserialize, Serialize};

/// What happened during one generate → evaluate → select step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step number (1-indexed)
    pub step: usize,
    pub generation: GenerationMethod,
    pub evaluation: EvaluationMethod,
    /// Flattened candidate texts, in generation order
    pub candidates: Vec<String>,
    /// One score per candidate
    pub scores: Vec<f64>,
    /// Selected candidate indices
    pub selected_ids: Vec<usize>,
    /// Texts of the selected candidates (the next beam)
    pub selected: Vec<String>,
}

/// Full trace of one beam search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchTrace {
    pub problem: String,
    pub steps: Vec<StepRecord>,
    pub final_beam: Vec<String>,
}

impl SearchTrace {
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            steps: Vec::new(),
            final_beam: Vec::new(),
        }
    }

    pub fn push_step(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    pub fn finish(&mut self, final_beam: Vec<String>) {
        self.final_beam = final_beam;
    }

    /// Human-readable rendering used in the consensus history
    pub fn render(&self) -> String {
        let mut lines = vec![format!(
            "Starting reasoning process for question: {}\n",
            self.problem
        )];

        for record in &self.steps {
            lines.push(format!("\nStep {}: Generation\n", record.step));
            let label = match record.generation {
                GenerationMethod::Sample => "Generated thoughts",
                GenerationMethod::Propose => "Proposed thoughts",
            };
            lines.push(format!("{}: {:?}\n", label, record.candidates));

            lines.push(format!("Step {}: Evaluation\n", record.step));
            let label = match record.evaluation {
                EvaluationMethod::Vote => "Votes for each thought",
                EvaluationMethod::Value => "Values for each thought",
            };
            lines.push(format!("{}: {:?}\n", label, record.scores));

            lines.push(format!("Step {}: Selection\n", record.step));
            lines.push(format!(
                "Selected thoughts for the next step: {:?}\n",
                record.selected
            ));
        }

        lines.push(format!("\nFinal selected thought: {:?}\n", self.final_beam));
        lines.join("\n")
    }
}
