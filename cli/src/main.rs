//! CLI entrypoint for thought-quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tq_application::{
    BeamSearchUseCase, CompositeProgressNotifier, ConsensusUseCase, ConversationLogger,
    LoggingOracle, NoProgress, Oracle, OracleVerifier, ProgressNotifier, RunBenchmarkInput,
    RunBenchmarkUseCase, SolverConfig,
};
use tq_domain::{OutputFormat, Problem, ScoreCache, TaskRegistry};
use tq_infrastructure::{
    ConfigLoader, FileConfig, JsonResultStore, JsonlConversationLogger, JsonlDataset, OpenAiOracle,
};
use tq_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress, TracingProgress};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Load configuration, then let flags override it
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    apply_overrides(&mut config, &cli);

    let _log_guard = init_logging(cli.verbose, config.logging.dir.as_deref());
    info!("Starting thought-quorum");

    // Every configuration error surfaces here, before any oracle exists
    let solver = config.validate()?;
    let task = TaskRegistry::with_builtin().get(&solver.task)?;

    if cli.problem.is_none() && cli.dataset.is_none() {
        bail!("A problem is required. Use --dataset to run a benchmark.");
    }

    // === Dependency Injection ===
    let logger = config
        .logging
        .conversation_log
        .as_deref()
        .and_then(JsonlConversationLogger::new)
        .map(|logger| Arc::new(logger) as Arc<dyn ConversationLogger>);

    let search_oracle = build_oracle(&config, "search", logger.clone())?;
    let verifier_oracle = build_oracle(&config, "verifier", logger)?;

    let search = BeamSearchUseCase::new(search_oracle, task.clone(), solver.search.clone())
        .with_cache(Arc::new(ScoreCache::new()));
    let consensus = Arc::new(
        ConsensusUseCase::new(
            Arc::new(search),
            Arc::new(OracleVerifier::new(verifier_oracle)),
            task,
        )
        .with_params(solver.consensus.clone()),
    );

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    // JSON on stdout stays clean of progress lines
    let bars = ProgressReporter::new();
    let simple = SimpleProgress;
    let display: &dyn ProgressNotifier = match (cli.quiet, cli.dataset.is_some()) {
        (true, _) => &NoProgress,
        (false, true) => &bars,
        (false, false) if format == OutputFormat::Json => &NoProgress,
        (false, false) => &simple,
    };
    let progress = CompositeProgressNotifier::new(vec![display, &TracingProgress]);

    match &cli.dataset {
        Some(path) => run_benchmark(consensus, &config, &solver, path, &progress).await,
        None => {
            let text = cli.problem.clone().unwrap_or_default();
            solve_one(&consensus, &solver, &text, format, &progress).await
        }
    }
}

fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    let search = &mut config.search;
    if let Some(task) = &cli.task {
        search.task = task.clone();
    }
    if let Some(method) = &cli.method_generate {
        search.method_generate = method.clone();
    }
    if let Some(method) = &cli.method_evaluate {
        search.method_evaluate = method.clone();
    }
    if let Some(method) = &cli.method_select {
        search.method_select = method.clone();
    }
    if let Some(style) = &cli.prompt_sample {
        search.prompt_sample = style.clone();
    }
    if let Some(n) = cli.n_generate_sample {
        search.n_generate_sample = n;
    }
    if let Some(n) = cli.n_evaluate_sample {
        search.n_evaluate_sample = n;
    }
    if let Some(n) = cli.n_select_sample {
        search.n_select_sample = n;
    }

    if let Some(model) = &cli.model {
        config.oracle.model = model.clone();
    }
    if let Some(seed) = cli.seed {
        config.consensus.seed = seed;
    }

    let run = &mut config.run;
    if let Some(n) = cli.test_number {
        run.test_number = n;
    }
    if let Some(n) = cli.save_every {
        run.save_every = n;
    }
    if let Some(root) = &cli.output_root {
        run.output_root = root.clone();
    }
    if let Some(label) = &cli.label {
        run.label = label.clone();
    }
    if let Some(split) = &cli.split {
        run.split = split.clone();
    }

    if let Some(path) = &cli.conversation_log {
        config.logging.conversation_log = Some(path.display().to_string());
    }
    if !config.output.color {
        colored::control::set_override(false);
    }
}

/// Install the stderr subscriber and, when a directory is configured, a
/// daily-rolling file layer
fn init_logging(verbose: u8, dir: Option<&str>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "thought-quorum.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

fn build_oracle(
    config: &FileConfig,
    role: &'static str,
    logger: Option<Arc<dyn ConversationLogger>>,
) -> Result<Arc<dyn Oracle>> {
    let oracle_config = match role {
        "verifier" => config.verifier_oracle_config(),
        _ => config.search_oracle_config(),
    };
    if oracle_config.api_key.is_none() {
        warn!(
            "{} is not set; requests to {} go out unauthenticated",
            config.oracle.api_key_env, oracle_config.api_url
        );
    }

    let oracle: Arc<dyn Oracle> = Arc::new(OpenAiOracle::new(oracle_config)?);
    Ok(match logger {
        Some(logger) => Arc::new(LoggingOracle::new(oracle, logger, role)),
        None => oracle,
    })
}

async fn solve_one(
    consensus: &ConsensusUseCase,
    solver: &SolverConfig,
    text: &str,
    format: OutputFormat,
    progress: &dyn ProgressNotifier,
) -> Result<()> {
    let problem = Problem::try_new(text)?;
    let mut rng = StdRng::seed_from_u64(solver.seed);

    let resolution = consensus
        .execute_with_progress(&problem, &mut rng, progress)
        .await?;

    println!(
        "{}",
        ConsoleFormatter::render(format, problem.content(), &resolution)
    );
    Ok(())
}

async fn run_benchmark(
    consensus: Arc<ConsensusUseCase>,
    config: &FileConfig,
    solver: &SolverConfig,
    dataset: &Path,
    progress: &dyn ProgressNotifier,
) -> Result<()> {
    let items = JsonlDataset::load(dataset, config.run.limit())?;
    let result_file = config.run.result_file(&config.oracle.model, solver.seed);
    info!(
        "Running {} problems from {}, results in {}",
        items.len(),
        dataset.display(),
        result_file.display()
    );

    let args = json!({
        "dataset": dataset.display().to_string(),
        "model": config.oracle.model,
        "search": config.search,
        "consensus": config.consensus,
        "run": config.run,
    });
    let input = RunBenchmarkInput::new(items, args)
        .with_save_every(config.run.save_every)
        .with_seed(solver.seed);

    let store = Arc::new(JsonResultStore::new(&result_file));
    let report = RunBenchmarkUseCase::new(consensus, store)
        .execute_with_progress(input, progress)
        .await?;

    println!(
        "{}",
        ConsoleFormatter::format_report(&report, &result_file.display().to_string())
    );
    Ok(())
}
