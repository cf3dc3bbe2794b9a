//! AOC CLI - Command-line interface for running Advent of Code solvers

mod aggregator;
mod cli;
mod config;
mod error;
mod executor;
mod inputs;
mod output;

// Import aoc-solutions to link the solver plugins
use aoc_solutions as _;

use aoc_solver::SolverRegistryBuilder;
use clap::Parser;
use cli::Args;
use config::Config;
use executor::Executor;
use output::OutputFormatter;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so answers on stdout stay clean; `RUST_LOG` overrides `-v`
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run the selected solvers, returning whether every part succeeded
fn run(args: Args) -> Result<bool, error::CliError> {
    let config = Config::from_args(args)?;
    info!(input_dir = %config.input_dir.display(), tags = ?config.tags, "configured");

    // Build registry with tag filtering (only once)
    let registry = build_registry(&config.tags)?;
    let executor = Executor::new(registry, config.input_store()?, &config)
        .map_err(|e| error::CliError::Executor(e.into()))?;

    let work_items = executor.collect_work_items();
    if work_items.is_empty() {
        println!("No solvers found matching the specified filters.");
        return Ok(true);
    }

    // Missing inputs fail their parts later; say so up front
    for work in work_items
        .iter()
        .filter(|w| !executor.inputs().contains(w.year, w.day))
    {
        warn!(
            year = work.year,
            day = work.day,
            path = %executor.inputs().input_path(work.year, work.day).display(),
            "missing input"
        );
    }

    run_executor(executor, config.quiet)
}

/// Run the executor and print results in year/day/part order
fn run_executor(executor: Executor, quiet: bool) -> Result<bool, error::CliError> {
    let work_items = executor.collect_work_items();
    if !quiet {
        println!("Running {} solver(s)...", work_items.len());
    }

    let expected_keys = aggregator::ResultKey::expected(&work_items);

    // Set up result channel
    let (tx, rx) = std::sync::mpsc::channel();

    // Run executor in background thread
    let executor_handle = std::thread::spawn(move || executor.execute(tx));

    // Collect and display results in order using aggregator
    let formatter = OutputFormatter::new(quiet);
    let mut aggregator = aggregator::ResultAggregator::new(expected_keys);
    let mut results = Vec::new();

    for result in rx {
        for ready in aggregator.add(result) {
            formatter.print_result(&ready);
            results.push(ready);
        }
    }

    // Anything still buffered arrived without its predecessors
    for ready in aggregator.drain() {
        formatter.print_result(&ready);
        results.push(ready);
    }

    for key in aggregator.missing() {
        warn!(%key, "no result received");
    }

    executor_handle
        .join()
        .map_err(|_| error::CliError::Config("Executor thread panicked".to_string()))?
        .map_err(error::CliError::Executor)?;

    formatter.print_summary(&results);

    Ok(aggregator.is_complete() && results.iter().all(|r| r.answer.is_ok()))
}

/// Build registry with tag filtering
fn build_registry(tags: &[String]) -> Result<aoc_solver::SolverRegistry, error::CliError> {
    let builder = SolverRegistryBuilder::new();

    let builder = if tags.is_empty() {
        builder.register_all_plugins()?
    } else {
        builder.register_solver_plugins(|plugin| {
            tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
        })?
    };

    Ok(builder.build())
}
