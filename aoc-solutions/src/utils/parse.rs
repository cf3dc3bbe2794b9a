//! Input parsing helpers

use anyhow::anyhow;
use aoc_solver::ParseError;

/// Parse each line of `input` with `f`, labelling failures with the 1-based line number.
///
/// Trailing blank lines are ignored.
pub fn parse_lines<T, F>(input: &str, mut f: F) -> Result<Vec<T>, ParseError>
where
    F: FnMut(&str) -> anyhow::Result<T>,
{
    input
        .trim_end()
        .lines()
        .enumerate()
        .map(|(line_idx, line)| f(line).map_err(|e| anyhow!("(line {}) {}", line_idx + 1, e)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid)
}

/// Convert an `anyhow` error into a format error
pub fn invalid(error: anyhow::Error) -> ParseError {
    ParseError::InvalidFormat(error.to_string())
}
