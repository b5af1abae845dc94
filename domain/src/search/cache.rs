//! Score cache shared by value scorers.
//!
//! Keys are the literal rendered evaluation prompt. A cached entry is only
//! correct while prompt rendering is a pure function of (problem, candidate);
//! a task with nondeterministic prompts must run with `cache_value = false`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Thread-safe memo from evaluation prompt to score.
///
/// Concurrent fills of the same key are last-writer-wins.
#[derive(Debug, Default)]
pub struct ScoreCache {
    entries: Mutex<HashMap<String, f64>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Hit/miss counters of a [`ScoreCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a prompt, counting the hit or miss
    pub fn get(&self, prompt: &str) -> Option<f64> {
        let value = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(prompt)
            .copied();
        match value {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        value
    }

    pub fn insert(&self, prompt: impl Into<String>, score: f64) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt.into(), score);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
