use anyhow::bail;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::parse::parse_lines;

const SCREEN_WIDTH: usize = 40;
const SCREEN_HEIGHT: usize = 6;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 10, tags = ["2022", "simulation"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Noop,
    AddX(i32),
}

#[derive(Debug)]
pub struct SharedData {
    program: Vec<Instruction>,
    /// Value of X during each cycle, 1-based; index 0 is unused
    register: Option<Vec<i64>>,
}

impl SharedData {
    fn register_trace(&mut self) -> &[i64] {
        self.register.get_or_insert_with(|| {
            let mut x: i64 = 1;
            let mut trace = vec![x];
            for instruction in &self.program {
                match *instruction {
                    Instruction::Noop => trace.push(x),
                    Instruction::AddX(v) => {
                        trace.push(x);
                        trace.push(x);
                        x += i64::from(v);
                    }
                }
            }
            // The value after the last instruction holds for any later cycle
            trace.push(x);
            trace
        })
    }

    /// X during `cycle`; cycles past the program keep the final value
    fn x_during(&mut self, cycle: usize) -> i64 {
        let trace = self.register_trace();
        trace[cycle.min(trace.len() - 1)]
    }
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let program = parse_lines(input, |line| {
            let mut words = line.split_whitespace();
            match (words.next(), words.next(), words.next()) {
                (Some("noop"), None, None) => Ok(Instruction::Noop),
                (Some("addx"), Some(v), None) => Ok(Instruction::AddX(v.parse()?)),
                _ => bail!("unknown instruction '{}'", line),
            }
        })?;
        if program.is_empty() {
            return Err(ParseError::MissingData("empty program".to_string()));
        }
        Ok(SharedData {
            program,
            register: None,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let strength: i64 = (20..=220)
            .step_by(40)
            .map(|cycle| cycle as i64 * shared.x_during(cycle))
            .sum();
        Ok(strength.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let rows: Vec<String> = (0..SCREEN_HEIGHT)
            .map(|row| {
                (0..SCREEN_WIDTH)
                    .map(|col| {
                        let sprite = shared.x_during(row * SCREEN_WIDTH + col + 1);
                        if (sprite - col as i64).abs() <= 1 { '#' } else { '.' }
                    })
                    .collect()
            })
            .collect();
        Ok(rows.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        addx 15
        addx -11
        addx 6
        addx -3
        addx 5
        addx -1
        addx -8
        addx 13
        addx 4
        noop
        addx -1
        addx 5
        addx -1
        addx 5
        addx -1
        addx 5
        addx -1
        addx 5
        addx -1
        addx -35
        addx 1
        addx 24
        addx -19
        addx 1
        addx 16
        addx -11
        noop
        noop
        addx 21
        addx -15
        noop
        noop
        addx -3
        addx 9
        addx 1
        addx -3
        addx 8
        addx 1
        addx 5
        noop
        noop
        noop
        noop
        noop
        addx -36
        noop
        addx 1
        addx 7
        noop
        noop
        noop
        addx 2
        addx 6
        noop
        noop
        noop
        noop
        noop
        addx 1
        noop
        noop
        addx 7
        addx 1
        noop
        addx -13
        addx 13
        addx 7
        noop
        addx 1
        addx -33
        noop
        noop
        noop
        addx 2
        noop
        noop
        noop
        addx 8
        noop
        addx -1
        addx 2
        addx 1
        noop
        addx 17
        addx -9
        addx 1
        addx 1
        addx -3
        addx 11
        noop
        noop
        addx 1
        noop
        addx 1
        noop
        noop
        addx -13
        addx -19
        addx 1
        addx 3
        addx 26
        addx -30
        addx 12
        addx -1
        addx 3
        addx 1
        noop
        noop
        noop
        addx -9
        addx 18
        addx 1
        addx 2
        noop
        noop
        addx 9
        noop
        noop
        noop
        addx -1
        addx 2
        addx -37
        addx 1
        addx 3
        noop
        addx 15
        addx -21
        addx 22
        addx -6
        addx 1
        noop
        addx 2
        addx 1
        noop
        addx -10
        noop
        noop
        addx 20
        addx 1
        addx 2
        addx 2
        addx -6
        addx -11
        noop
        noop
        noop
    "};

    const EXAMPLE_SCREEN: &str = indoc! {"
        ##..##..##..##..##..##..##..##..##..##..
        ###...###...###...###...###...###...###.
        ####....####....####....####....####....
        #####.....#####.....#####.....#####.....
        ######......######......######......####
        #######.......#######.......#######....."};

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "13140");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), EXAMPLE_SCREEN);
    }

    #[test]
    fn test_small_program_trace() {
        let mut shared = Solver::parse("noop\naddx 3\naddx -5").unwrap();
        let during: Vec<i64> = (1..=6).map(|c| shared.x_during(c)).collect();
        assert_eq!(during, vec![1, 1, 1, 4, 4, -1]);
        assert_eq!(shared.x_during(500), -1);
    }

    #[test]
    fn test_bad_instruction() {
        let err = Solver::parse("noop\naddx\n").unwrap_err();
        assert!(err.to_string().contains("(line 2)"));
        assert!(Solver::parse("jmp 4").is_err());
        assert!(Solver::parse("").is_err());
    }
}
