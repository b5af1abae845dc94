//! Dataset loading
//!
//! Turns a JSONL problem file into labelled [`BenchmarkItem`](tq_application::BenchmarkItem)s.

mod jsonl;

pub use jsonl::{DatasetError, JsonlDataset, SHUFFLE_SEED};
