//! Pyroclastic Flow: stack falling rocks in a seven-wide chamber.
//!
//! Chamber rows are bit masks, bit `c` set when column `c` (from the left
//! wall) is filled. Part 2 detects the repeating state of (rock shape, jet
//! position, surface profile) and skips whole cycles.

use std::collections::HashMap;

use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::debug;

use crate::utils::parse::invalid;

const WIDTH: u32 = 7;
const RIGHT_WALL: u8 = 1 << (WIDTH - 1);
const LEFT_WALL: u8 = 1;
const SPAWN_GAP: usize = 3;

/// Rock shapes bottom row first, already offset two columns from the left wall
const ROCKS: [&[u8]; 5] = [
    &[0b0011_1100],
    &[0b0000_1000, 0b0001_1100, 0b0000_1000],
    &[0b0001_1100, 0b0001_0000, 0b0001_0000],
    &[0b0000_0100; 4],
    &[0b0000_1100; 2],
];

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 17, tags = ["2022", "simulation", "cycle"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jet {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CycleKey {
    rock: usize,
    jet: usize,
    profile: [usize; WIDTH as usize],
}

struct Chamber<'a> {
    rows: Vec<u8>,
    jets: &'a [Jet],
    next_jet: usize,
    dropped: u64,
}

impl<'a> Chamber<'a> {
    fn new(jets: &'a [Jet]) -> Self {
        Self {
            rows: Vec::new(),
            jets,
            next_jet: 0,
            dropped: 0,
        }
    }

    fn height(&self) -> usize {
        self.rows.len()
    }

    fn collides(&self, rock: &[u8], bottom: usize) -> bool {
        rock.iter()
            .enumerate()
            .any(|(i, row)| self.rows.get(bottom + i).is_some_and(|filled| filled & row != 0))
    }

    fn push(&self, rock: &mut Vec<u8>, bottom: usize, jet: Jet) {
        let shifted: Vec<u8> = match jet {
            Jet::Left if rock.iter().all(|r| r & LEFT_WALL == 0) => rock.iter().map(|r| r >> 1).collect(),
            Jet::Right if rock.iter().all(|r| r & RIGHT_WALL == 0) => rock.iter().map(|r| r << 1).collect(),
            _ => return,
        };
        if !self.collides(&shifted, bottom) {
            *rock = shifted;
        }
    }

    fn drop_rock(&mut self) {
        let mut rock = ROCKS[(self.dropped % ROCKS.len() as u64) as usize].to_vec();
        let mut bottom = self.height() + SPAWN_GAP;

        loop {
            let jet = self.jets[self.next_jet];
            self.next_jet = (self.next_jet + 1) % self.jets.len();
            self.push(&mut rock, bottom, jet);

            if bottom == 0 || self.collides(&rock, bottom - 1) {
                break;
            }
            bottom -= 1;
        }

        let top = bottom + rock.len();
        if self.rows.len() < top {
            self.rows.resize(top, 0);
        }
        for (i, row) in rock.iter().enumerate() {
            self.rows[bottom + i] |= row;
        }
        self.dropped += 1;
    }

    /// Depth of the highest filled cell in each column, measured from the top
    fn profile(&self) -> [usize; WIDTH as usize] {
        std::array::from_fn(|col| {
            self.rows
                .iter()
                .rev()
                .position(|row| row & (1 << col) != 0)
                .unwrap_or(self.rows.len())
        })
    }

    fn cycle_key(&self) -> CycleKey {
        CycleKey {
            rock: (self.dropped % ROCKS.len() as u64) as usize,
            jet: self.next_jet,
            profile: self.profile(),
        }
    }
}

/// Tower height after dropping `rocks` rocks one by one
pub fn simulate(jets: &[Jet], rocks: u64) -> u64 {
    let mut chamber = Chamber::new(jets);
    while chamber.dropped < rocks {
        chamber.drop_rock();
    }
    chamber.height() as u64
}

/// Tower height after `rocks` rocks, skipping repeated cycles
pub fn simulate_with_cycles(jets: &[Jet], rocks: u64) -> u64 {
    let mut chamber = Chamber::new(jets);
    let mut seen: HashMap<CycleKey, (u64, usize)> = HashMap::new();
    let mut skipped_height = 0;

    while chamber.dropped < rocks {
        chamber.drop_rock();
        if skipped_height > 0 {
            continue;
        }

        let key = chamber.cycle_key();
        if let Some(&(start_rocks, start_height)) = seen.get(&key) {
            let cycle_rocks = chamber.dropped - start_rocks;
            let cycle_height = (chamber.height() - start_height) as u64;
            let cycles = (rocks - chamber.dropped) / cycle_rocks;
            debug!(
                start = start_rocks,
                length = cycle_rocks,
                height = cycle_height,
                "found rock cycle"
            );
            skipped_height = cycles * cycle_height;
            chamber.dropped += cycles * cycle_rocks;
        } else {
            seen.insert(key, (chamber.dropped, chamber.height()));
        }
    }
    chamber.height() as u64 + skipped_height
}

fn parse_jets(input: &str) -> anyhow::Result<Vec<Jet>> {
    let jets = input
        .trim()
        .chars()
        .enumerate()
        .map(|(idx, c)| match c {
            '<' => Ok(Jet::Left),
            '>' => Ok(Jet::Right),
            other => Err(anyhow!("invalid jet '{}' at position {}", other, idx + 1)),
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    if jets.is_empty() {
        bail!("no jets in input");
    }
    Ok(jets)
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Jet>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_jets(input).map_err(invalid)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(simulate(shared, 2022).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(simulate_with_cycles(shared, 1_000_000_000_000).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = ">>><<><>><<<>><>>><<<>>><<<><<<>><>><<>>\n";

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "3068");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "1514285714288");
    }

    #[test]
    fn test_cycle_skip_matches_full_simulation() {
        let jets = Solver::parse(EXAMPLE).unwrap();
        for rocks in [1, 5, 2022, 5000] {
            assert_eq!(simulate_with_cycles(&jets, rocks), simulate(&jets, rocks), "{rocks} rocks");
        }
    }

    #[test]
    fn test_first_rocks() {
        let jets = Solver::parse(EXAMPLE).unwrap();
        // Flat rock lands on the floor, the plus sits on top of it
        assert_eq!(simulate(&jets, 1), 1);
        assert_eq!(simulate(&jets, 2), 4);
    }

    #[test]
    fn test_invalid_jets() {
        assert!(Solver::parse("<<>x>").is_err());
        assert!(Solver::parse("\n").is_err());
    }
}
