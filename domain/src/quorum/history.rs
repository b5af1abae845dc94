//! Consensus history: the explainability artifact returned with every answer.
//!
//! The history is an append-only text log of every reasoner's search trace,
//! every verifier rationale and every decision point.

use super::consensus::{ConsensusOutcome, RoundRecord};

const SEPARATOR_WIDTH: usize = 50;

/// Append-only history text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    text: String,
    agreement_threshold: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            text: String::new(),
            agreement_threshold: 2,
        }
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of agreeing reasoners quoted in the agreement line
    pub fn with_agreement_threshold(mut self, threshold: usize) -> Self {
        self.agreement_threshold = threshold;
        self
    }

    fn threshold_text(&self) -> String {
        match self.agreement_threshold {
            1 => "one".to_string(),
            2 => "two".to_string(),
            3 => "three".to_string(),
            n => n.to_string(),
        }
    }

    fn separator(&mut self) {
        self.text.push_str(&"*".repeat(SEPARATOR_WIDTH));
        self.text.push('\n');
    }

    /// Record a completed round: traces first, then verdicts
    pub fn push_round(&mut self, record: &RoundRecord) {
        self.text
            .push_str(&format!(" ########## Round {} ########## \n", record.round));

        for outcome in &record.outcomes {
            self.text.push_str(&format!(
                "***** Reasoner {} output: *****\n{}\n",
                outcome.reasoner, outcome.trace
            ));
            self.separator();
        }

        for outcome in &record.outcomes {
            self.text.push_str(&format!(
                "Reasoner {}: Answer: {}, Verified: {}\n",
                outcome.reasoner, outcome.answer, outcome.verified
            ));
            self.text
                .push_str(&format!("Verifier response:\n{}\n", outcome.rationale));
            self.separator();
        }
    }

    /// Record that the round ended without agreement
    pub fn push_no_agreement(&mut self) {
        self.text
            .push_str("No agreement among verified answers. Continuing to next round.\n\n");
    }

    /// Record the terminal decision
    pub fn push_outcome(&mut self, outcome: &ConsensusOutcome) {
        let line = match outcome {
            ConsensusOutcome::Agreed { answer, .. } => format!(
                "At least {} verified reasoners agree. Final Answer: {}\n\n",
                self.threshold_text(),
                answer
            ),
            ConsensusOutcome::MostFrequentVerified { answer } => format!(
                "Maximum rounds reached or no agreement. Choosing most frequent answer: {}\n\n",
                answer
            ),
            ConsensusOutcome::MostFrequentOverall { answer } => format!(
                "No verified answers. Choosing most frequent answer from all answers: {}\n\n",
                answer
            ),
            ConsensusOutcome::RandomTieBreak { answer } => format!(
                "No verified answers and all answers repeated equally. Randomly selected answer: {}\n\n",
                answer
            ),
        };
        self.text.push_str(&line);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::consensus::ReasonerOutcome;

    fn record() -> RoundRecord {
        RoundRecord::new(
            1,
            vec![
                ReasonerOutcome {
                    reasoner: 1,
                    reasoning: "the answer is 4".to_string(),
                    trace: "trace one".to_string(),
                    answer: "4".to_string(),
                    verified: true,
                    rationale: "Reasoning is Valid".to_string(),
                },
                ReasonerOutcome {
                    reasoner: 2,
                    reasoning: "the answer is 5".to_string(),
                    trace: "trace two".to_string(),
                    answer: "5".to_string(),
                    verified: false,
                    rationale: "Reasoning is Invalid".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_round_lists_traces_then_verdicts() {
        let mut history = History::new();
        history.push_round(&record());
        let text = history.as_str();

        assert!(text.starts_with(" ########## Round 1 ########## \n"));
        let trace_pos = text.find("trace two").unwrap();
        let verdict_pos = text.find("Reasoner 1: Answer: 4, Verified: true").unwrap();
        assert!(trace_pos < verdict_pos);
        assert!(text.contains("Reasoner 2: Answer: 5, Verified: false"));
        assert!(text.contains("Verifier response:\nReasoning is Invalid"));
    }

    #[test]
    fn test_outcome_lines() {
        let mut history = History::new();
        history.push_no_agreement();
        history.push_outcome(&ConsensusOutcome::RandomTieBreak {
            answer: "3".to_string(),
        });
        let text = history.into_string();
        assert!(text.contains("Continuing to next round."));
        assert!(text.contains("Randomly selected answer: 3"));
    }

    #[test]
    fn test_agreement_line_quotes_threshold() {
        let agreed = ConsensusOutcome::Agreed {
            answer: "4".to_string(),
            round: 1,
        };

        let mut history = History::new();
        history.push_outcome(&agreed);
        assert!(history.as_str().contains("At least two verified reasoners agree. Final Answer: 4"));

        let mut history = History::new().with_agreement_threshold(3);
        history.push_outcome(&agreed);
        assert!(history.as_str().contains("At least three verified reasoners agree."));
    }
}
