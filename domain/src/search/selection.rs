//! Candidate selection.
//!
//! Both strategies return indices into the flattened candidate list; the
//! caller maps them back to thoughts. The result always has exactly
//! `min(n, scores.len())` entries.

use super::params::SelectionMethod;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use tracing::warn;

/// Select `n` candidate indices using `method`
pub fn select<R: Rng + ?Sized>(
    method: SelectionMethod,
    scores: &[f64],
    n: usize,
    rng: &mut R,
) -> Vec<usize> {
    match method {
        SelectionMethod::Greedy => select_greedy(scores, n),
        SelectionMethod::Sample => select_sample(scores, n, rng),
    }
}

/// Top-`n` indices by score, descending.
///
/// The sort is stable, so equal scores keep their original candidate order.
/// NaN ranks below every other score.
pub fn select_greedy(scores: &[f64], n: usize) -> Vec<usize> {
    let rank = |i: usize| {
        let score = scores[i];
        if score.is_nan() { f64::NEG_INFINITY } else { score }
    };
    let mut ids: Vec<usize> = (0..scores.len()).collect();
    ids.sort_by(|a, b| rank(*b).total_cmp(&rank(*a)));
    ids.truncate(n);
    ids
}

/// Draw `min(n, len)` indices with replacement, proportional to score.
///
/// Negative and non-finite scores weigh nothing. When no candidate has
/// positive weight the draw falls back to uniform.
pub fn select_sample<R: Rng + ?Sized>(scores: &[f64], n: usize, rng: &mut R) -> Vec<usize> {
    let count = n.min(scores.len());
    if count == 0 {
        return Vec::new();
    }

    let weights: Vec<f64> = scores
        .iter()
        .map(|s| if s.is_finite() && *s > 0.0 { *s } else { 0.0 })
        .collect();

    match WeightedIndex::new(&weights) {
        Ok(dist) => (0..count).map(|_| dist.sample(rng)).collect(),
        Err(e) => {
            warn!(
                "Score vector {:?} cannot be normalized ({}); sampling uniformly",
                scores, e
            );
            (0..count).map(|_| rng.gen_range(0..scores.len())).collect()
        }
    }
}
