use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::{Itertools, MinMaxResult};
use tracing::debug;

use crate::utils::parse::invalid;

const SPREAD_ROUNDS: usize = 10;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 23, tags = ["2022", "simulation", "grid"])]
pub struct Solver;

/// (row, column), rows growing southward
type Pos = (i32, i32);

const NEIGHBOURS: [Pos; 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Step and the three cells that must be free, in the initial N, S, W, E order
const PROPOSALS: [(Pos, [Pos; 3]); 4] = [
    ((-1, 0), [(-1, -1), (-1, 0), (-1, 1)]),
    ((1, 0), [(1, -1), (1, 0), (1, 1)]),
    ((0, -1), [(-1, -1), (0, -1), (1, -1)]),
    ((0, 1), [(-1, 1), (0, 1), (1, 1)]),
];

fn offset((r, c): Pos, (dr, dc): Pos) -> Pos {
    (r + dr, c + dc)
}

#[derive(Debug, Clone)]
pub struct Grove {
    elves: HashSet<Pos>,
    rounds: usize,
}

impl Grove {
    fn is_free(&self, pos: Pos, cells: &[Pos]) -> bool {
        cells.iter().all(|&d| !self.elves.contains(&offset(pos, d)))
    }

    fn proposal(&self, elf: Pos) -> Option<Pos> {
        if self.is_free(elf, &NEIGHBOURS) {
            return None;
        }
        (0..PROPOSALS.len())
            .map(|i| PROPOSALS[(self.rounds + i) % PROPOSALS.len()])
            .find(|(_, checks)| self.is_free(elf, checks))
            .map(|(step, _)| offset(elf, step))
    }

    /// Run one round; returns how many elves moved
    fn round(&mut self) -> usize {
        let mut targets: HashMap<Pos, Vec<Pos>> = HashMap::new();
        for &elf in &self.elves {
            if let Some(target) = self.proposal(elf) {
                targets.entry(target).or_default().push(elf);
            }
        }

        let mut moved = 0;
        for (target, proposers) in targets {
            if let [elf] = proposers.as_slice() {
                self.elves.remove(elf);
                self.elves.insert(target);
                moved += 1;
            }
        }
        self.rounds += 1;
        moved
    }

    /// Empty tiles in the smallest rectangle containing every elf
    fn empty_ground(&self) -> usize {
        let span = |range: MinMaxResult<i32>| match range {
            MinMaxResult::NoElements => 0,
            MinMaxResult::OneElement(_) => 1,
            MinMaxResult::MinMax(lo, hi) => (hi - lo + 1) as usize,
        };
        let rows = span(self.elves.iter().map(|p| p.0).minmax());
        let cols = span(self.elves.iter().map(|p| p.1).minmax());
        rows * cols - self.elves.len()
    }
}

fn parse_grove(input: &str) -> anyhow::Result<Grove> {
    let mut elves = HashSet::new();
    for (row, line) in input.trim_end().lines().enumerate() {
        for (col, c) in line.trim_end().chars().enumerate() {
            match c {
                '#' => {
                    elves.insert((row as i32, col as i32));
                }
                '.' => {}
                other => return Err(anyhow!("(line {}) unexpected '{}'", row + 1, other)),
            }
        }
    }
    if elves.is_empty() {
        bail!("no elves in the grove");
    }
    Ok(Grove { elves, rounds: 0 })
}

impl AocParser for Solver {
    type SharedData<'a> = Grove;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_grove(input).map_err(invalid)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut grove = shared.clone();
        for _ in 0..SPREAD_ROUNDS {
            grove.round();
        }
        Ok(grove.empty_ground().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut grove = shared.clone();
        loop {
            let moved = grove.round();
            if moved == 0 {
                return Ok(grove.rounds.to_string());
            }
            if grove.rounds % 100 == 0 {
                debug!(round = grove.rounds, moved, "elves still spreading");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        ....#..
        ..###.#
        #...#.#
        .#...##
        #.###..
        ##.#.##
        .#..#..
    "};

    const SMALL_EXAMPLE: &str = indoc! {"
        .....
        ..##.
        ..#..
        .....
        ..##.
        .....
    "};

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "110");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "20");
    }

    #[test]
    fn test_small_example_settles() {
        let mut grove = Solver::parse(SMALL_EXAMPLE).unwrap();
        // The middle pair both propose the same cell and neither moves
        assert_eq!(grove.round(), 3);
        while grove.round() > 0 {}
        assert_eq!(grove.rounds, 4);

        let expected: HashSet<Pos> = [(0, 2), (1, 4), (2, 0), (3, 4), (5, 2)].into();
        assert_eq!(grove.elves, expected);
    }

    #[test]
    fn test_lone_elf_stays() {
        let mut shared = Solver::parse("#").unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "0");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "1");
    }

    #[test]
    fn test_bad_grove() {
        assert!(Solver::parse("..#\n.x.").is_err());
        assert!(Solver::parse("...\n...").is_err());
    }
}
