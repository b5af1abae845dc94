//! Beam search domain.
//!
//! Pure building blocks of the generate → evaluate → select loop. The loop
//! itself, which needs the oracle, lives in the application layer.
//!
//! ```text
//!   Beam ──generate──▶ candidates ──evaluate──▶ scores ──select──▶ Beam'
//!    ▲                                                              │
//!    └──────────────────────────── S steps ─────────────────────────┘
//! ```

pub mod cache;
pub mod params;
pub mod selection;
pub mod thought;
pub mod trace;

pub use cache::{CacheStats, ScoreCache};
pub use params::{EvaluationMethod, GenerationMethod, PromptStyle, SearchParams, SelectionMethod};
pub use selection::{select, select_greedy, select_sample};
pub use thought::{Beam, Thought};
pub use trace::{SearchTrace, StepRecord};
