//! Parallel executor for running solvers

use crate::cli::ParallelizeBy;
use crate::config::Config;
use crate::error::{ArcExecutorError, ExecutorError};
use crate::inputs::InputStore;
use aoc_solver::{DynSolver, SolverRegistry};
use chrono::TimeDelta;
use itertools::Itertools;
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};

/// Result from a single solver execution
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, ArcExecutorError>,
    pub solve_duration: TimeDelta,
    /// Parse time of the instance that solved this part; `None` if parsing never succeeded
    pub parse_duration: Option<TimeDelta>,
}

/// Work item representing a solver to execute
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Parallel executor for running solvers
pub struct Executor {
    sync_executor_config: SyncExecutorConfig,
    thread_pool: rayon::ThreadPool,
}

/// The parts of the executor shared by every worker thread
pub struct SyncExecutorConfig {
    registry: SolverRegistry,
    inputs: InputStore,
    parallelize_by: ParallelizeBy,
    year_filter: Option<u16>,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

impl Executor {
    /// Create a new executor from config
    pub fn new(
        registry: SolverRegistry,
        inputs: InputStore,
        config: &Config,
    ) -> Result<Self, ExecutorError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        Ok(Self {
            sync_executor_config: SyncExecutorConfig {
                registry,
                inputs,
                parallelize_by: config.parallelize_by,
                year_filter: config.year_filter,
                day_filter: config.day_filter,
                part_filter: config.part_filter,
            },
            thread_pool,
        })
    }

    /// The input store used by this executor
    pub fn inputs(&self) -> &InputStore {
        &self.sync_executor_config.inputs
    }

    /// Collect work items by filtering from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        let cfg = &self.sync_executor_config;
        cfg.registry
            .storage()
            .iter_info()
            .filter(|info| cfg.year_filter.is_none_or(|y| info.year == y))
            .filter(|info| cfg.day_filter.is_none_or(|d| info.day == d))
            .map(|info| WorkItem {
                year: info.year,
                day: info.day,
                parts: self.filter_parts(info.parts),
            })
            .filter(|w| !w.parts.is_empty())
            .collect()
    }

    /// Filter parts based on config.part_filter and solver's max parts
    #[allow(clippy::reversed_empty_ranges)]
    fn filter_parts(&self, max_parts: u8) -> RangeInclusive<u8> {
        match self.sync_executor_config.part_filter {
            Some(p) if p <= max_parts => p..=p,
            Some(_) => 1..=0,
            None => 1..=max_parts,
        }
    }

    /// Execute all work items and send results to channel
    pub fn execute(&self, tx: Sender<SolverResult>) -> Result<(), ArcExecutorError> {
        let work_items = self.collect_work_items();
        info!(
            puzzles = work_items.len(),
            mode = ?self.sync_executor_config.parallelize_by,
            threads = self.thread_pool.current_num_threads(),
            "executing"
        );

        match self.sync_executor_config.parallelize_by {
            ParallelizeBy::Sequential => {
                let mut collected_error: Option<ArcExecutorError> = None;
                for work in work_items {
                    if let Err(e) = run_work_item(&work, &tx, &self.sync_executor_config) {
                        collected_error = Some(ArcExecutorError::combine_opt(collected_error, e));
                    }
                }
                collected_error.map_or(Ok(()), Err)
            }
            ParallelizeBy::Year => {
                let by_year: Vec<Vec<WorkItem>> = work_items
                    .into_iter()
                    .chunk_by(|w| w.year)
                    .into_iter()
                    .map(|(_, group)| group.collect())
                    .collect();

                self.execute_parallel_grouped(by_year, &tx)
            }
            // Part additionally splits each day's parts in run_work_item
            ParallelizeBy::Day | ParallelizeBy::Part => self.execute_parallel(work_items, &tx),
        }
    }

    /// Execute work items in parallel, collecting errors
    fn execute_parallel(
        &self,
        work_items: Vec<WorkItem>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let sync_executor_config = &self.sync_executor_config;

        self.thread_pool.install(|| {
            work_items
                .into_par_iter()
                .map(|work| run_work_item(&work, tx, sync_executor_config).err())
                .reduce_with(merge_errors)
                .unwrap_or_default()
                .map_or(Ok(()), Err)
        })
    }

    /// Execute grouped work items in parallel (for year-level parallelism)
    fn execute_parallel_grouped(
        &self,
        groups: Vec<Vec<WorkItem>>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let sync_executor_config = &self.sync_executor_config;

        self.thread_pool.install(|| {
            groups
                .into_par_iter()
                .map(|items| {
                    let mut err = None;
                    for work in items {
                        if let Err(e) = run_work_item(&work, tx, sync_executor_config) {
                            err = Some(ArcExecutorError::combine_opt(err, e))
                        }
                    }
                    err
                })
                .reduce_with(merge_errors)
                .unwrap_or_default()
                .map_or(Ok(()), Err)
        })
    }
}

fn merge_errors(
    a: Option<ArcExecutorError>,
    b: Option<ArcExecutorError>,
) -> Option<ArcExecutorError> {
    match (a, b) {
        (Some(a), b) => Some(ArcExecutorError::combine_opt(b, a)),
        (None, b) => b,
    }
}

/// One failed result per part, all sharing the same error
fn send_failure(
    work: &WorkItem,
    error: ArcExecutorError,
    tx: &Sender<SolverResult>,
) -> Result<(), ArcExecutorError> {
    for part in work.parts.clone() {
        send(
            tx,
            SolverResult {
                year: work.year,
                day: work.day,
                part,
                answer: Err(error.clone()),
                solve_duration: TimeDelta::zero(),
                parse_duration: None,
            },
        )?;
    }
    Ok(())
}

fn send(tx: &Sender<SolverResult>, result: SolverResult) -> Result<(), ArcExecutorError> {
    tx.send(result)
        .map_err(|_| ExecutorError::ChannelSend.into())
}

/// Load the input for a work item and solve its parts
///
/// Input and parse failures become failed results rather than errors; only
/// channel and pool failures are returned.
fn run_work_item(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    sync_executor_config: &SyncExecutorConfig,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);
    let input = match sync_executor_config.inputs.get(year, day) {
        Ok(input) => input,
        Err(source) => {
            warn!(year, day, error = %source, "input unavailable");
            return send_failure(work, ExecutorError::Input { year, day, source }.into(), tx);
        }
    };

    if matches!(sync_executor_config.parallelize_by, ParallelizeBy::Part) {
        run_parts_parallel(work, &input, tx, &sync_executor_config.registry)
    } else {
        run_parts_sequential(work, &input, tx, &sync_executor_config.registry)
    }
}

/// Run each part on its own solver instance, buffering results to emit in order
fn run_parts_parallel(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    registry: &SolverRegistry,
) -> Result<(), ArcExecutorError> {
    let (result_tx, result_rx) = std::sync::mpsc::channel();
    let (year, day) = (work.year, work.day);

    work.parts
        .clone()
        .into_par_iter()
        .for_each_with(result_tx, |rtx, part| {
            let result = match registry.create_solver(year, day, input) {
                Ok(mut solver) => solve_part(year, day, part, &mut *solver),
                Err(e) => failed_result(year, day, part, ExecutorError::from(e).into()),
            };
            rtx.send(result).ok();
        });

    // Buffer and emit results in part order
    let mut results: Vec<SolverResult> = result_rx.into_iter().collect();
    results.sort_by_key(|r| r.part);
    results.into_iter().try_for_each(|result| send(tx, result))
}

/// Parse once and solve the parts in order on one instance, streaming results
fn run_parts_sequential(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    registry: &SolverRegistry,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);
    let mut solver = match registry.create_solver(year, day, input) {
        Ok(solver) => solver,
        Err(e) => {
            warn!(year, day, error = %e, "solver creation failed");
            return send_failure(work, ExecutorError::from(e).into(), tx);
        }
    };
    debug!(year, day, parse = ?solver.parse_duration(), "parsed input");

    for part in work.parts.clone() {
        send(tx, solve_part(year, day, part, &mut *solver))?;
    }
    Ok(())
}

fn failed_result(year: u16, day: u8, part: u8, error: ArcExecutorError) -> SolverResult {
    SolverResult {
        year,
        day,
        part,
        answer: Err(error),
        solve_duration: TimeDelta::zero(),
        parse_duration: None,
    }
}

/// Solve a single part on an existing instance
fn solve_part(year: u16, day: u8, part: u8, solver: &mut dyn DynSolver) -> SolverResult {
    let parse_duration = Some(solver.parse_duration());
    match solver.solve(part) {
        Ok(result) => {
            debug!(year, day, part, solve = ?result.duration(), "solved");
            SolverResult {
                year,
                day,
                part,
                solve_duration: result.duration(),
                answer: Ok(result.answer),
                parse_duration,
            }
        }
        Err(e) => {
            warn!(year, day, part, error = %e, "solve failed");
            SolverResult {
                parse_duration,
                ..failed_result(
                    year,
                    day,
                    part,
                    ExecutorError::from(aoc_solver::SolverError::from(e)).into(),
                )
            }
        }
    }
}
