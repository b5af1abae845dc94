//! Answer tallies for Quorum consensus
//!
//! An [`AnswerTally`] is an insertion-ordered multiset of extracted answers.
//! Iteration order is the order in which each distinct answer was first seen,
//! which makes "first encountered maximum" a well-defined tie-break.

use serde::{Deserialize, Serialize};

/// Insertion-ordered multiset of answers
///
/// # Example
///
/// ```
/// use tq_domain::quorum::AnswerTally;
///
/// let mut tally = AnswerTally::new();
/// tally.extend(["7", "9", "7"]);
/// assert_eq!(tally.count("7"), 2);
/// assert_eq!(tally.most_frequent(), Some("7"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerTally {
    entries: Vec<(String, usize)>,
    total: usize,
}

impl AnswerTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `answer`
    pub fn add(&mut self, answer: impl Into<String>) {
        let answer = answer.into();
        match self.entries.iter_mut().find(|(a, _)| *a == answer) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((answer, 1)),
        }
        self.total += 1;
    }

    pub fn extend<I, S>(&mut self, answers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for answer in answers {
            self.add(answer);
        }
    }

    /// Occurrences of `answer`
    pub fn count(&self, answer: &str) -> usize {
        self.entries
            .iter()
            .find(|(a, _)| a == answer)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Total number of occurrences (multiset size)
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct answers
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Distinct answers with their counts, in first-seen order
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), *c))
    }

    /// Most frequent answer; ties go to the one seen first
    pub fn most_frequent(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (answer, count) in self.entries() {
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((answer, count));
            }
        }
        best.map(|(a, _)| a)
    }

    /// Whether the two highest counts are equal
    pub fn top_two_tied(&self) -> bool {
        let mut counts: Vec<usize> = self.entries.iter().map(|(_, c)| *c).collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        counts.len() > 1 && counts[0] == counts[1]
    }

    /// The `index`-th element of the multiset, counting duplicates
    pub fn nth_occurrence(&self, mut index: usize) -> Option<&str> {
        for (answer, count) in self.entries() {
            if index < count {
                return Some(answer);
            }
            index -= count;
        }
        None
    }

    /// Answers reaching at least `threshold` occurrences, in first-seen order
    pub fn reaching(&self, threshold: usize) -> impl Iterator<Item = &str> {
        self.entries()
            .filter(move |(_, c)| *c >= threshold)
            .map(|(a, _)| a)
    }

    /// Generate a compact summary (e.g., "42×2, 17×1")
    pub fn summary(&self) -> String {
        self.entries()
            .map(|(a, c)| {
                let label = if a.is_empty() { "<none>" } else { a };
                format!("{}×{}", label, c)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for AnswerTally {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tally = AnswerTally::new();
        tally.extend(iter);
        tally
    }
}
