//! Configuration resolution from CLI args

use crate::cli::{Args, ParallelizeBy};
use crate::error::{CliError, InputError};
use crate::inputs::InputStore;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where an explicitly supplied input comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

/// Input given with `--input` for exactly one puzzle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitInput {
    pub year: u16,
    pub day: u8,
    pub source: InputSource,
}

/// Resolved runtime configuration
#[derive(Debug)]
pub struct Config {
    /// Year filter (None = all years)
    pub year_filter: Option<u16>,
    /// Day filter (None = all days)
    pub day_filter: Option<u8>,
    /// Part filter (None = all parts)
    pub part_filter: Option<u8>,
    /// Tags to filter solvers
    pub tags: Vec<String>,
    /// Directory holding puzzle inputs
    pub input_dir: PathBuf,
    /// Input for a single puzzle given on the command line
    pub explicit_input: Option<ExplicitInput>,
    /// Number of threads for parallel execution
    pub thread_count: usize,
    /// Parallelization level
    pub parallelize_by: ParallelizeBy,
    /// Quiet mode
    pub quiet: bool,
}

impl Config {
    /// Build config from CLI args
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        let input_dir = expand_tilde(&args.input_dir);
        let thread_count = args.threads.unwrap_or_else(num_cpus);
        if thread_count == 0 {
            return Err(CliError::Config("--threads must be at least 1".to_string()));
        }

        let explicit_input = match (args.input, args.year, args.day) {
            (None, _, _) => None,
            (Some(path), Some(year), Some(day)) => Some(ExplicitInput {
                year,
                day,
                source: if path == Path::new("-") {
                    InputSource::Stdin
                } else {
                    InputSource::File(path)
                },
            }),
            (Some(_), _, _) => {
                return Err(CliError::Config(
                    "--input needs both --year and --day".to_string(),
                ));
            }
        };

        Ok(Config {
            year_filter: args.year,
            day_filter: args.day,
            part_filter: args.part,
            tags: args.tags,
            input_dir,
            explicit_input,
            thread_count,
            parallelize_by: args.parallelize_by,
            quiet: args.quiet,
        })
    }

    /// Build the input store, reading any explicit input up front
    pub fn input_store(&self) -> Result<InputStore, CliError> {
        let store = InputStore::new(self.input_dir.clone());
        let Some(explicit) = &self.explicit_input else {
            return Ok(store);
        };

        let text = match &explicit.source {
            InputSource::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .map_err(InputError::Stdin)?;
                text
            }
            InputSource::File(path) => std::fs::read_to_string(path).map_err(|source| InputError::Io {
                path: path.clone(),
                source,
            })?,
        };
        Ok(store.with_explicit(explicit.year, explicit.day, text))
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && let Some(home) = dirs::home_dir()
    {
        if path_str == "~" {
            return home;
        }
        if let Some(rest) = path_str.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Get number of CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
