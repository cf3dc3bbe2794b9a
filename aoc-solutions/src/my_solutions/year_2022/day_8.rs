use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::parse::invalid;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 8, tags = ["2022", "grid"])]
pub struct Solver;

/// Rectangular grid of tree heights, row-major
#[derive(Debug)]
pub struct Forest {
    heights: Vec<u8>,
    width: usize,
    height: usize,
}

const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl Forest {
    fn at(&self, row: usize, col: usize) -> u8 {
        self.heights[row * self.width + col]
    }

    /// Trees walking away from (row, col) in a direction, nearest first
    fn line_of_sight(
        &self,
        row: usize,
        col: usize,
        (dr, dc): (isize, isize),
    ) -> impl Iterator<Item = u8> + '_ {
        (1..)
            .map(move |step| {
                let r = row.checked_add_signed(dr * step)?;
                let c = col.checked_add_signed(dc * step)?;
                (r < self.height && c < self.width).then(|| self.at(r, c))
            })
            .take_while(Option::is_some)
            .flatten()
    }

    fn visible(&self, row: usize, col: usize) -> bool {
        let tree = self.at(row, col);
        DIRECTIONS
            .iter()
            .any(|&dir| self.line_of_sight(row, col, dir).all(|other| other < tree))
    }

    fn scenic_score(&self, row: usize, col: usize) -> usize {
        let tree = self.at(row, col);
        DIRECTIONS
            .iter()
            .map(|&dir| {
                let mut seen = 0;
                for other in self.line_of_sight(row, col, dir) {
                    seen += 1;
                    if other >= tree {
                        break;
                    }
                }
                seen
            })
            .product()
    }

    fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |r| (0..self.width).map(move |c| (r, c)))
    }
}

fn parse_forest(input: &str) -> anyhow::Result<Forest> {
    let mut heights = Vec::new();
    let mut width = None;
    let mut height = 0;

    for (line_idx, line) in input.trim().lines().enumerate() {
        let line = line.trim();
        let row_start = heights.len();
        for c in line.chars() {
            let digit = c
                .to_digit(10)
                .ok_or_else(|| anyhow!("(line {}) invalid tree height '{}'", line_idx + 1, c))?;
            heights.push(digit as u8);
        }
        let row_width = heights.len() - row_start;
        match width {
            None => width = Some(row_width),
            Some(w) if w != row_width => {
                bail!("(line {}) expected {} trees, got {}", line_idx + 1, w, row_width)
            }
            Some(_) => {}
        }
        height += 1;
    }

    match width {
        Some(width) if width > 0 => Ok(Forest {
            heights,
            width,
            height,
        }),
        _ => bail!("empty forest"),
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Forest;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_forest(input).map_err(invalid)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .positions()
            .filter(|&(r, c)| shared.visible(r, c))
            .count()
            .to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .positions()
            .map(|(r, c)| shared.scenic_score(r, c))
            .max()
            .unwrap_or(0)
            .to_string())
    }
}
