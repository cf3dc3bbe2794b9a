use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::debug;

use crate::utils::parse::parse_lines;

const DECRYPTION_KEY: i64 = 811_589_153;
const DECRYPTION_ROUNDS: usize = 10;
const GROVE_OFFSETS: [usize; 3] = [1000, 2000, 3000];

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 20, tags = ["2022"])]
pub struct Solver;

/// Mix `values` `rounds` times, returning the values in their final circular order
pub fn mix(values: &[i64], rounds: usize) -> Vec<i64> {
    let len = values.len();
    // order[k] is the original index of the value at position k
    let mut order: Vec<usize> = (0..len).collect();
    let cycle = len.saturating_sub(1) as i64;

    for round in 0..rounds {
        if cycle == 0 {
            break;
        }
        for (original, &value) in values.iter().enumerate() {
            let Some(from) = order.iter().position(|&o| o == original) else {
                continue;
            };
            order.remove(from);
            let to = (from as i64 + value.rem_euclid(cycle)) % cycle;
            order.insert(to as usize, original);
        }
        debug!(round = round + 1, "mixed");
    }

    order.into_iter().map(|o| values[o]).collect()
}

/// Sum of the values 1000, 2000 and 3000 positions after zero
pub fn grove_coordinates(mixed: &[i64]) -> Result<i64, SolveError> {
    let zero = mixed
        .iter()
        .position(|&v| v == 0)
        .ok_or_else(|| SolveError::failed("no 0 in the encrypted file"))?;
    GROVE_OFFSETS
        .iter()
        .map(|offset| mixed[(zero + offset) % mixed.len()])
        .try_fold(0i64, i64::checked_add)
        .ok_or_else(|| SolveError::failed("grove coordinates overflow"))
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<i64>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let values = parse_lines(input, |line| Ok(line.trim().parse()?))?;
        if values.is_empty() {
            return Err(ParseError::MissingData("empty encrypted file".to_string()));
        }
        Ok(values)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        grove_coordinates(&mix(shared, 1)).map(|sum| sum.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let decrypted: Vec<i64> = shared
            .iter()
            .map(|v| v.checked_mul(DECRYPTION_KEY))
            .collect::<Option<_>>()
            .ok_or_else(|| SolveError::failed("decrypted value overflows"))?;
        grove_coordinates(&mix(&decrypted, DECRYPTION_ROUNDS)).map(|sum| sum.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "1\n2\n-3\n3\n-2\n0\n4\n";

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "3");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "1623178306");
    }

    #[test]
    fn test_single_round_order() {
        let values = Solver::parse(EXAMPLE).unwrap();
        let mixed = mix(&values, 1);
        // Rotate so the sequence starts at 1 for a stable comparison
        let start = mixed.iter().position(|&v| v == 1).unwrap();
        let rotated: Vec<i64> = mixed[start..].iter().chain(&mixed[..start]).copied().collect();
        assert_eq!(rotated, vec![1, 2, -3, 4, 0, 3, -2]);
    }

    #[test]
    fn test_missing_zero_fails() {
        let mut shared = Solver::parse("1\n2\n3").unwrap();
        assert!(<Solver as PartSolver<1>>::solve(&mut shared).is_err());
    }

    #[test]
    fn test_single_value() {
        let mut shared = Solver::parse("0").unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "0");
    }

    #[test]
    fn test_large_values_fail_instead_of_overflowing() {
        let mut shared = Solver::parse("20000000000\n0\n1\n").unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "20000000001");
        assert!(<Solver as PartSolver<2>>::solve(&mut shared).is_err());

        let mut shared = Solver::parse(&format!("{}\n0\n-5\n", i64::MAX)).unwrap();
        assert_eq!(
            <Solver as PartSolver<1>>::solve(&mut shared).unwrap(),
            (i64::MAX - 5).to_string()
        );

        let mut shared = Solver::parse(&format!("{0}\n0\n{0}\n", i64::MAX)).unwrap();
        assert!(<Solver as PartSolver<1>>::solve(&mut shared).is_err());
    }

    #[test]
    fn test_bad_number() {
        assert!(Solver::parse("1\nseven\n").is_err());
    }
}
