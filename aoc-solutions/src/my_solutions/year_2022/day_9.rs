use std::collections::HashSet;

use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::parse::parse_lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 9, tags = ["2022", "simulation"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Move {
    direction: Direction,
    steps: u32,
}

/// Pull `knot` one step toward `leader` if they no longer touch
fn follow(leader: (i64, i64), knot: &mut (i64, i64)) {
    let dx = leader.0 - knot.0;
    let dy = leader.1 - knot.1;
    if dx.abs() > 1 || dy.abs() > 1 {
        knot.0 += dx.signum();
        knot.1 += dy.signum();
    }
}

/// Number of distinct cells the last knot of a `length`-knot rope visits
pub fn tail_visits(moves: &[Move], length: usize) -> usize {
    let mut rope = vec![(0i64, 0i64); length.max(1)];
    let mut visited = HashSet::from([(0, 0)]);

    for mv in moves {
        let (dx, dy) = mv.direction.delta();
        for _ in 0..mv.steps {
            rope[0].0 += dx;
            rope[0].1 += dy;
            for i in 1..rope.len() {
                let leader = rope[i - 1];
                follow(leader, &mut rope[i]);
            }
            if let Some(&tail) = rope.last() {
                visited.insert(tail);
            }
        }
    }
    visited.len()
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Move>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_lines(input, |line| {
            let (dir, steps) = line
                .trim()
                .split_once(' ')
                .ok_or_else(|| anyhow!("expected '<direction> <steps>', got '{}'", line))?;
            let direction = match dir {
                "U" => Direction::Up,
                "D" => Direction::Down,
                "L" => Direction::Left,
                "R" => Direction::Right,
                other => bail!("unknown direction '{}'", other),
            };
            Ok(Move {
                direction,
                steps: steps.parse()?,
            })
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(tail_visits(shared, 2).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(tail_visits(shared, 10).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        R 4
        U 4
        L 3
        D 1
        R 4
        D 1
        L 5
        R 2
    "};

    const LARGER_EXAMPLE: &str = indoc! {"
        R 5
        U 8
        L 8
        D 3
        R 17
        D 10
        L 25
        U 20
    "};

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "13");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "1");
    }

    #[test]
    fn test_larger_example_long_rope() {
        let mut shared = Solver::parse(LARGER_EXAMPLE).unwrap();
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "36");
    }

    #[test]
    fn test_follow_diagonal() {
        let mut knot = (0, 0);
        follow((1, 2), &mut knot);
        assert_eq!(knot, (1, 1));
        follow((1, 2), &mut knot);
        assert_eq!(knot, (1, 1));
    }

    #[test]
    fn test_bad_moves() {
        assert!(Solver::parse("X 3").is_err());
        assert!(Solver::parse("R three").is_err());
        assert!(Solver::parse("R").is_err());
    }
}
