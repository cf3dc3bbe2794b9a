//! Error types for the CLI

use std::path::PathBuf;

use thiserror::Error;
use thiserror_ext::Arc as ArcDerive;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input error outside of a solver run (e.g. reading `--input`)
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Registration error
    #[error("Registration error: {0}")]
    Registration(#[from] aoc_solver::RegistrationError),

    /// Executor error (wraps Arc for cheap cloning)
    #[error("{0}")]
    Executor(#[from] ArcExecutorError),
}

/// Errors raised while locating or reading puzzle inputs
#[derive(Error, Debug)]
pub enum InputError {
    /// No input file for the puzzle
    #[error("no input at {}", .path.display())]
    Missing { path: PathBuf },

    /// Input exists but could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading standard input failed
    #[error("failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),
}

/// Executor-specific errors
///
/// Also used as the per-part failure of a [`SolverResult`](crate::executor::SolverResult):
/// the Arc newtype lets one input or parse failure be reported for every part.
#[derive(Error, Debug, ArcDerive)]
#[thiserror_ext(newtype(name = ArcExecutorError))]
pub enum ExecutorError {
    /// Input could not be loaded
    #[error("Input unavailable for {year}/{day:02}: {source}")]
    Input {
        year: u16,
        day: u8,
        #[source]
        source: InputError,
    },

    /// Solver creation or execution failed
    #[error("{0}")]
    Solver(#[from] aoc_solver::SolverError),

    /// Channel send error
    #[error("Channel send error")]
    ChannelSend,

    /// Thread pool creation failed
    #[error("Thread pool creation failed: {0}")]
    ThreadPool(String),

    /// Multiple errors collected during parallel execution
    #[error("Multiple errors occurred ({} total)", .0.len())]
    Multiple(Vec<ArcExecutorError>),
}

impl ArcExecutorError {
    /// Combine two Arc-wrapped errors into one
    ///
    /// `Multiple` errors are flattened, so combining never nests.
    pub fn combine(first: ArcExecutorError, second: ArcExecutorError) -> ArcExecutorError {
        let errors = match (first.inner(), second.inner()) {
            (ExecutorError::Multiple(v1), ExecutorError::Multiple(v2)) => {
                let mut combined = v1.clone();
                combined.extend(v2.iter().cloned());
                combined
            }
            (_, ExecutorError::Multiple(v)) => {
                let mut combined = vec![first];
                combined.extend(v.iter().cloned());
                combined
            }
            (ExecutorError::Multiple(v), _) => {
                let mut combined = v.clone();
                combined.push(second);
                combined
            }
            _ => vec![first, second],
        };
        ExecutorError::Multiple(errors).into()
    }

    /// Combine an optional error with a new error
    pub fn combine_opt(
        existing: Option<ArcExecutorError>,
        new: ArcExecutorError,
    ) -> ArcExecutorError {
        match existing {
            Some(e) => Self::combine(e, new),
            None => new,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(err: &ArcExecutorError) -> usize {
        match err.inner() {
            ExecutorError::Multiple(v) => v.len(),
            _ => 1,
        }
    }

    #[test]
    fn test_combine_flattens() {
        let a: ArcExecutorError = ExecutorError::ChannelSend.into();
        let b: ArcExecutorError = ExecutorError::ThreadPool("boom".into()).into();
        let ab = ArcExecutorError::combine(a.clone(), b.clone());
        assert_eq!(count(&ab), 2);

        let abab = ArcExecutorError::combine(ab.clone(), ab);
        assert_eq!(count(&abab), 4);

        let aab = ArcExecutorError::combine(a.clone(), ArcExecutorError::combine(a, b));
        assert_eq!(count(&aab), 3);
        assert_eq!(aab.to_string(), "Multiple errors occurred (3 total)");
    }

    #[test]
    fn test_combine_opt_passes_through() {
        let only = ArcExecutorError::combine_opt(None, ExecutorError::ChannelSend.into());
        assert_eq!(count(&only), 1);
    }

    #[test]
    fn test_missing_input_message() {
        let err = ExecutorError::Input {
            year: 2022,
            day: 3,
            source: InputError::Missing {
                path: PathBuf::from("/inputs/2022_day03.txt"),
            },
        };
        assert_eq!(
            err.to_string(),
            "Input unavailable for 2022/03: no input at /inputs/2022_day03.txt"
        );
    }
}
