//! GSM8K-style JSONL dataset.
//!
//! One object per line with `question` and `answer`; the label is the
//! number after `#### ` in `answer`. Problems are shuffled with a fixed seed
//! before ids are assigned, so ids are stable across runs.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tq_application::BenchmarkItem;
use tq_domain::Problem;
use tracing::info;

/// Seed of the dataset shuffle, independent of the run seed
pub const SHUFFLE_SEED: u64 = 10;

static LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#### (\d+)").expect("label pattern is valid"));

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Cannot read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Line {line}: empty question")]
    EmptyQuestion { line: usize },
}

#[derive(Deserialize)]
struct Record {
    question: String,
    #[serde(default)]
    answer: String,
}

/// Loader for JSONL problem files
pub struct JsonlDataset;

impl JsonlDataset {
    /// Load, shuffle and label the file at `path`.
    ///
    /// `limit` keeps only the first problems after shuffling.
    pub fn load(path: &Path, limit: Option<usize>) -> Result<Vec<BenchmarkItem>, DatasetError> {
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let items = Self::parse(&text, limit)?;
        info!("Loaded {} problems from {}", items.len(), path.display());
        Ok(items)
    }

    /// Same as [`load`](Self::load) over in-memory JSONL
    pub fn parse(text: &str, limit: Option<usize>) -> Result<Vec<BenchmarkItem>, DatasetError> {
        let mut records = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(line)
                .map_err(|source| DatasetError::Parse { line: i + 1, source })?;
            let problem = Problem::try_new(record.question)
                .map_err(|_| DatasetError::EmptyQuestion { line: i + 1 })?;
            records.push((problem, Self::label(&record.answer)));
        }

        records.shuffle(&mut StdRng::seed_from_u64(SHUFFLE_SEED));

        let take = limit.unwrap_or(records.len());
        Ok(records
            .into_iter()
            .take(take)
            .enumerate()
            .map(|(id, (problem, label))| BenchmarkItem {
                id: id.to_string(),
                problem,
                label,
            })
            .collect())
    }

    /// Number after `#### `, or "" when absent
    pub fn label(answer: &str) -> String {
        LABEL_PATTERN
            .captures(answer)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}
