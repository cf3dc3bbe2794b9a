//! Full of Hot Air: balanced base-5 ("SNAFU") numbers.
//!
//! Digits are `=` (-2), `-` (-1), `0`, `1` and `2`, most significant first.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::parse::parse_lines;

const DIGITS: [char; 5] = ['=', '-', '0', '1', '2'];

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 1)]
#[aoc(year = 2022, day = 25, tags = ["2022", "number"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snafu(i64);

impl From<i64> for Snafu {
    fn from(value: i64) -> Self {
        Snafu(value)
    }
}

impl From<Snafu> for i64 {
    fn from(value: Snafu) -> Self {
        value.0
    }
}

impl FromStr for Snafu {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            bail!("empty SNAFU number");
        }
        let value = s.chars().try_fold(0i128, |acc, c| {
            let digit = match c {
                '=' => -2,
                '-' => -1,
                '0' => 0,
                '1' => 1,
                '2' => 2,
                other => bail!("invalid SNAFU digit '{}'", other),
            };
            acc.checked_mul(5)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| anyhow!("SNAFU number '{}' overflows", s))
        })?;
        i64::try_from(value)
            .map(Snafu)
            .map_err(|_| anyhow!("SNAFU number '{}' overflows", s))
    }
}

impl fmt::Display for Snafu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0");
        }
        // Wide enough that subtracting a digit never overflows
        let mut rest = self.0 as i128;
        let mut digits = Vec::new();
        while rest != 0 {
            let digit = (rest + 2).rem_euclid(5) - 2;
            digits.push(DIGITS[(digit + 2) as usize]);
            rest = (rest - digit) / 5;
        }
        digits.iter().rev().try_for_each(|&c| write!(f, "{c}"))
    }
}

impl Snafu {
    pub fn checked_add(self, rhs: Snafu) -> Option<Snafu> {
        self.0.checked_add(rhs.0).map(Snafu)
    }
}

/// Panics on overflow like the underlying `i64`; see [`Snafu::checked_add`]
impl Add for Snafu {
    type Output = Snafu;

    fn add(self, rhs: Snafu) -> Snafu {
        Snafu(self.0 + rhs.0)
    }
}

impl Sum for Snafu {
    fn sum<I: Iterator<Item = Snafu>>(iter: I) -> Snafu {
        iter.fold(Snafu::default(), Add::add)
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Snafu>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_lines(input, |line| line.trim().parse())
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .try_fold(Snafu::default(), |total, &n| total.checked_add(n))
            .map(|total| total.to_string())
            .ok_or_else(|| SolveError::failed("fuel requirement sum overflows"))
    }
}
