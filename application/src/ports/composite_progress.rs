//! Composite progress notifier that delegates to multiple notifiers.
//!
//! Used to fan out round and benchmark events to both the terminal progress
//! display and the structured log at the same time.

use super::progress::ProgressNotifier;

/// A progress notifier that delegates to multiple inner notifiers.
///
/// Uses borrowed references with a lifetime parameter so both owned and
/// borrowed notifiers can be composed without wrapper types.
///
/// ```text
/// ConsensusUseCase.execute_with_progress(problem, rng, &composite)
///                                                      |
///                         +----------------------------+-------------+
///                         |                                          |
///               ProgressReporter                              TracingProgress
///               → indicatif bars                              → tracing events
/// ```
pub struct CompositeProgressNotifier<'a> {
    delegates: Vec<&'a dyn ProgressNotifier>,
}

impl<'a> CompositeProgressNotifier<'a> {
    pub fn new(delegates: Vec<&'a dyn ProgressNotifier>) -> Self {
        Self { delegates }
    }
}

/// Macro to delegate a method call to all inner notifiers.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl ProgressNotifier for CompositeProgressNotifier<'_> {
    fn on_round_start(&self, round: usize, reasoners: usize) {
        delegate!(self, on_round_start, round, reasoners);
    }

    fn on_reasoner_complete(&self, round: usize, reasoner: usize, answer: &str, verified: bool) {
        delegate!(self, on_reasoner_complete, round, reasoner, answer, verified);
    }

    fn on_round_complete(&self, round: usize, agreed: Option<&str>) {
        delegate!(self, on_round_complete, round, agreed);
    }

    fn on_problem_complete(&self, done: usize, total: usize, correct: usize) {
        delegate!(self, on_problem_complete, done, total, correct);
    }
}
