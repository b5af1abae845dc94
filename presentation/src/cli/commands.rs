//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tq_domain::OutputFormat;

/// Output format for a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliOutputFormat {
    /// Answer followed by the full consensus history
    Full,
    /// Only the final answer
    Answer,
    /// JSON output
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Full => OutputFormat::Full,
            CliOutputFormat::Answer => OutputFormat::Answer,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for thought-quorum
#[derive(Parser, Debug)]
#[command(name = "thought-quorum")]
#[command(author, version, about = "Beam-searched reasoning settled by verified consensus")]
#[command(long_about = r#"
thought-quorum runs several independent tree-of-thoughts beam searches over a
problem, has a verifier judge each reasoning, and repeats in rounds until
enough verified reasoners agree on one answer.

Configuration files are loaded from (in priority order):
1. TQ_* environment variables   (TQ_ORACLE__MODEL=gpt-4o)
2. --config <path>              Explicit config file
3. ./thought-quorum.toml        Project-level config
4. ~/.config/thought-quorum/config.toml   Global config

Example:
  thought-quorum "Tom has 3 apples and buys 5 more. How many apples does he have?"
  thought-quorum --method-evaluate value --method-select sample "..."
  thought-quorum --dataset data/gsm8k_test.jsonl --test-number 50 --label exp1
"#)]
pub struct Cli {
    /// The problem to solve (not required with --dataset)
    pub problem: Option<String>,

    /// Run the benchmark over a JSONL dataset instead of a single problem
    #[arg(long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Reasoning task name
    #[arg(long, value_name = "NAME")]
    pub task: Option<String>,

    /// Candidate generation method (sample, propose)
    #[arg(long, value_name = "METHOD")]
    pub method_generate: Option<String>,

    /// Candidate evaluation method (value, vote)
    #[arg(long, value_name = "METHOD")]
    pub method_evaluate: Option<String>,

    /// Beam selection method (greedy, sample)
    #[arg(long, value_name = "METHOD")]
    pub method_select: Option<String>,

    /// Prompt style for sampling (standard, cot)
    #[arg(long, value_name = "STYLE")]
    pub prompt_sample: Option<String>,

    /// Samples drawn per beam member when generating
    #[arg(long, value_name = "N")]
    pub n_generate_sample: Option<usize>,

    /// Samples requested per evaluation call
    #[arg(long, value_name = "N")]
    pub n_evaluate_sample: Option<usize>,

    /// Beam width
    #[arg(long, value_name = "N")]
    pub n_select_sample: Option<usize>,

    /// Model used for search and verification
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Seed of the consensus controller RNG
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Number of dataset problems to run (-1 = all)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub test_number: Option<i64>,

    /// Checkpoint the result file after this many problems
    #[arg(long, value_name = "N")]
    pub save_every: Option<usize>,

    /// Root directory for benchmark result files
    #[arg(long, value_name = "PATH")]
    pub output_root: Option<String>,

    /// Experiment label used in the result file name
    #[arg(long, value_name = "LABEL")]
    pub label: Option<String>,

    /// Dataset split name used in the result file name
    #[arg(long, value_name = "SPLIT")]
    pub split: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<CliOutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write every oracle exchange to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}
