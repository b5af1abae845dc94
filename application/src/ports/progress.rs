//! Progress notification port
//!
//! Reports progress of consensus rounds and benchmark runs.

/// Callback for progress updates
///
/// Implementations live in the presentation layer. Every method has a no-op
/// default so adapters only implement what they display.
pub trait ProgressNotifier: Send + Sync {
    /// A consensus round is starting with `reasoners` independent searches
    fn on_round_start(&self, _round: usize, _reasoners: usize) {}

    /// A reasoner finished searching and was verified
    fn on_reasoner_complete(&self, _round: usize, _reasoner: usize, _answer: &str, _verified: bool) {}

    /// A round finished; `agreed` is set when it produced agreement
    fn on_round_complete(&self, _round: usize, _agreed: Option<&str>) {}

    /// A benchmark problem finished
    fn on_problem_complete(&self, _done: usize, _total: usize, _correct: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {}
