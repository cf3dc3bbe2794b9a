use std::ops::RangeInclusive;
use std::sync::LazyLock;

use anyhow::anyhow;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use regex::Regex;

use crate::utils::parse::parse_lines;

static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+),(\d+)-(\d+)$").expect("valid assignment regex"));

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 4, tags = ["2022"])]
pub struct Solver;

pub type Section = RangeInclusive<u32>;

fn section(low: u32, high: u32) -> Section {
    low.min(high)..=low.max(high)
}

fn contains(outer: &Section, inner: &Section) -> bool {
    outer.start() <= inner.start() && inner.end() <= outer.end()
}

fn overlaps(a: &Section, b: &Section) -> bool {
    a.start() <= b.end() && b.start() <= a.end()
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<(Section, Section)>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_lines(input, |line| {
            let caps = ASSIGNMENT
                .captures(line.trim())
                .ok_or_else(|| anyhow!("expected 'a-b,c-d', got '{}'", line))?;
            let n = |i: usize| caps[i].parse::<u32>();
            Ok((section(n(1)?, n(2)?), section(n(3)?, n(4)?)))
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .iter()
            .filter(|(a, b)| contains(a, b) || contains(b, a))
            .count()
            .to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .iter()
            .filter(|(a, b)| overlaps(a, b))
            .count()
            .to_string())
    }
}
