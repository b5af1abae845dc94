//! Console output formatter for resolutions and benchmark reports

use colored::Colorize;
use serde_json::json;
use tq_application::{BenchmarkReport, Resolution};
use tq_domain::{ConsensusOutcome, OutputFormat};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a resolution in the requested format
    pub fn render(format: OutputFormat, problem: &str, resolution: &Resolution) -> String {
        match format {
            OutputFormat::Full => Self::format(problem, resolution),
            OutputFormat::Answer => Self::format_answer_only(resolution),
            OutputFormat::Json => Self::format_json(problem, resolution),
        }
    }

    /// Format the complete resolution: every round, then the decision
    pub fn format(problem: &str, resolution: &Resolution) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Thought Quorum Result"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Problem:".cyan().bold(), problem));

        for round in resolution.ledger.rounds() {
            output.push_str(&Self::section_header(&format!("Round {}", round.round)));
            for outcome in &round.outcomes {
                let title = format!(
                    "── reasoner {} → {} ──",
                    outcome.reasoner,
                    Self::display_answer(&outcome.answer)
                );
                let title = if outcome.verified {
                    title.green().bold()
                } else {
                    title.red().bold()
                };
                output.push_str(&format!("\n{}\n{}\n", title, outcome.reasoning.trim_end()));
                output.push_str(&format!("{} {}\n", "Verifier:".dimmed(), outcome.rationale.trim()));
            }
        }

        output.push_str(&Self::section_header("Decision"));
        output.push_str(&format!(
            "\n{} {}\n{} {}\n",
            "Answer:".cyan().bold(),
            Self::display_answer(&resolution.answer).bold(),
            "Decided by:".cyan().bold(),
            Self::outcome_label(&resolution.outcome)
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Only the answer (empty line when nothing was extracted)
    pub fn format_answer_only(resolution: &Resolution) -> String {
        resolution.answer.clone()
    }

    /// Format as JSON
    pub fn format_json(problem: &str, resolution: &Resolution) -> String {
        let value = json!({
            "problem": problem,
            "answer": resolution.answer,
            "outcome": resolution.outcome,
            "rounds": resolution.ledger.rounds(),
            "history": resolution.history,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// One-paragraph benchmark summary
    pub fn format_report(report: &BenchmarkReport, result_file: &str) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Benchmark Summary"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Solved:".cyan().bold(), report.count));
        output.push_str(&format!("{} {}\n", "Correct:".cyan().bold(), report.correct));

        let accuracy = format!("{:.2}%", report.acc);
        let accuracy = if report.count > 0 && report.correct == report.count {
            accuracy.green().bold()
        } else {
            accuracy.yellow().bold()
        };
        output.push_str(&format!("{} {}\n", "Accuracy:".cyan().bold(), accuracy));
        output.push_str(&format!("{} {}\n", "Results:".dimmed(), result_file));

        output.push_str(&Self::footer());
        output
    }

    fn outcome_label(outcome: &ConsensusOutcome) -> String {
        match outcome {
            ConsensusOutcome::Agreed { .. } => outcome.to_string().green().to_string(),
            _ => outcome.to_string().yellow().to_string(),
        }
    }

    fn display_answer(answer: &str) -> &str {
        if answer.is_empty() { "(none)" } else { answer }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
