use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;

use crate::utils::parse::parse_lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 3, tags = ["2022"])]
pub struct Solver;

/// Set of item priorities, bit `p` set when priority `p` is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSet(u64);

impl ItemSet {
    fn from_items(items: &[u8]) -> anyhow::Result<Self> {
        items
            .iter()
            .try_fold(0u64, |set, &item| -> anyhow::Result<u64> {
                Ok(set | 1 << priority(item)?)
            })
            .map(ItemSet)
    }

    fn intersect(self, other: ItemSet) -> ItemSet {
        ItemSet(self.0 & other.0)
    }

    fn union(self, other: ItemSet) -> ItemSet {
        ItemSet(self.0 | other.0)
    }

    /// The single priority in the set, if there is exactly one
    fn single(self) -> Option<u32> {
        (self.0.count_ones() == 1).then(|| self.0.trailing_zeros())
    }
}

#[derive(Debug)]
pub struct Rucksack {
    left: ItemSet,
    right: ItemSet,
}

impl Rucksack {
    fn all(&self) -> ItemSet {
        self.left.union(self.right)
    }
}

pub fn priority(item: u8) -> anyhow::Result<u32> {
    match item {
        b'a'..=b'z' => Ok((item - b'a') as u32 + 1),
        b'A'..=b'Z' => Ok((item - b'A') as u32 + 27),
        other => Err(anyhow!("invalid item '{}'", other as char)),
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Rucksack>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_lines(input, |line| {
            let bytes = line.trim().as_bytes();
            if bytes.len() % 2 != 0 {
                bail!("rucksack has an odd number of items ({})", bytes.len());
            }
            let (left, right) = bytes.split_at(bytes.len() / 2);
            Ok(Rucksack {
                left: ItemSet::from_items(left)?,
                right: ItemSet::from_items(right)?,
            })
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .enumerate()
            .map(|(idx, sack)| {
                sack.left.intersect(sack.right).single().ok_or_else(|| {
                    SolveError::failed(format!(
                        "rucksack {} does not share exactly one item between compartments",
                        idx + 1
                    ))
                })
            })
            .sum::<Result<u32, _>>()
            .map(|sum| sum.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        if shared.len() % 3 != 0 {
            return Err(SolveError::failed(format!(
                "{} rucksacks cannot be split into groups of three",
                shared.len()
            )));
        }

        shared
            .iter()
            .tuples()
            .enumerate()
            .map(|(idx, (a, b, c))| {
                a.all()
                    .intersect(b.all())
                    .intersect(c.all())
                    .single()
                    .ok_or_else(|| {
                        SolveError::failed(format!("group {} has no unique badge", idx + 1))
                    })
            })
            .sum::<Result<u32, _>>()
            .map(|sum| sum.to_string())
    }
}
