//! Progress reporting for consensus rounds and benchmark runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use tq_application::ProgressNotifier;
use tracing::info;

/// Reports progress with indicatif bars: one per round, one for the dataset
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
    problem_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            round_bar: Mutex::new(None),
            problem_bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn problem_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:40.green/white}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }

    fn verdict_mark(answer: &str, verified: bool) -> String {
        let answer = if answer.is_empty() { "(none)" } else { answer };
        if verified {
            format!("{} {}", "v".green(), answer)
        } else {
            format!("{} {}", "x".red(), answer)
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_round_start(&self, round: usize, reasoners: usize) {
        let pb = self.multi.add(ProgressBar::new(reasoners as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(format!("Round {}", round));
        pb.set_message("Searching...");

        if let Ok(mut slot) = self.round_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_reasoner_complete(&self, _round: usize, reasoner: usize, answer: &str, verified: bool) {
        if let Ok(slot) = self.round_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(format!(
                "reasoner {} {}",
                reasoner,
                Self::verdict_mark(answer, verified)
            ));
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, round: usize, agreed: Option<&str>) {
        let message = match agreed {
            Some(answer) => format!("round {} agreed on {}", round, answer.green().bold()),
            None => format!("round {} without agreement", round).yellow().to_string(),
        };

        // Round bars are transient; the outcome moves to the problem bar
        if let Ok(mut slot) = self.round_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
        if let Ok(slot) = self.problem_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(message);
        }
    }

    fn on_problem_complete(&self, done: usize, total: usize, correct: usize) {
        let Ok(mut slot) = self.problem_bar.lock() else {
            return;
        };
        let pb = slot.get_or_insert_with(|| {
            let pb = self.multi.insert(0, ProgressBar::new(total as u64));
            pb.set_style(Self::problem_style());
            pb.set_prefix("Problems");
            pb
        });
        pb.set_position(done as u64);
        pb.set_message(format!("correct: {}", correct));
        if done >= total {
            pb.finish();
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: usize, reasoners: usize) {
        println!(
            "{} {} ({} reasoners)",
            "->".cyan(),
            format!("Round {}", round).bold(),
            reasoners
        );
    }

    fn on_reasoner_complete(&self, _round: usize, reasoner: usize, answer: &str, verified: bool) {
        println!(
            "  reasoner {} {}",
            reasoner,
            ProgressReporter::verdict_mark(answer, verified)
        );
    }

    fn on_round_complete(&self, _round: usize, agreed: Option<&str>) {
        if let Some(answer) = agreed {
            println!("  {} {}", "agreed on".green(), answer.bold());
        }
        println!();
    }

    fn on_problem_complete(&self, done: usize, total: usize, correct: usize) {
        println!(
            "{} {}/{} solved, {} correct",
            "==".cyan(),
            done,
            total,
            correct
        );
    }
}

/// Mirrors progress events into the tracing log
pub struct TracingProgress;

impl ProgressNotifier for TracingProgress {
    fn on_round_start(&self, round: usize, reasoners: usize) {
        info!(round, reasoners, "Round started");
    }

    fn on_reasoner_complete(&self, round: usize, reasoner: usize, answer: &str, verified: bool) {
        info!(round, reasoner, answer, verified, "Reasoner finished");
    }

    fn on_round_complete(&self, round: usize, agreed: Option<&str>) {
        info!(round, agreed = agreed.unwrap_or_default(), "Round finished");
    }

    fn on_problem_complete(&self, done: usize, total: usize, correct: usize) {
        info!(done, total, correct, "Problem finished");
    }
}
