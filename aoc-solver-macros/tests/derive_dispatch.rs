//! `#[derive(AocSolver)]` part dispatch

use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, Solver};

/// Blank-line separated groups of integers, like a calorie list
#[derive(Debug)]
struct Groups {
    totals: Vec<u32>,
    sorted: bool,
}

#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
struct GroupTotals;

impl AocParser for GroupTotals {
    type SharedData<'a> = Groups;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let totals = input
            .split("\n\n")
            .map(|group| {
                group
                    .lines()
                    .map(|line| {
                        line.trim()
                            .parse::<u32>()
                            .map_err(|_| ParseError::InvalidFormat(format!("bad number: {line}")))
                    })
                    .sum::<Result<u32, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Groups {
            totals,
            sorted: false,
        })
    }
}

impl PartSolver<1> for GroupTotals {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared.totals.sort_unstable_by(|a, b| b.cmp(a));
        shared.sorted = true;
        Ok(shared.totals[0].to_string())
    }
}

impl PartSolver<2> for GroupTotals {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        if !shared.sorted {
            return Err(SolveError::failed("part 1 must run first"));
        }
        Ok(shared.totals.iter().take(3).sum::<u32>().to_string())
    }
}

const INPUT: &str = "1000\n2000\n3000\n\n4000\n\n5000\n6000\n\n7000\n8000\n9000\n\n10000";

#[test]
fn test_parts_constant() {
    assert_eq!(<GroupTotals as Solver>::PARTS, 2);
}

#[test]
fn test_dispatch_to_part_solvers() {
    let mut shared = GroupTotals::parse(INPUT).unwrap();
    assert_eq!(GroupTotals::solve_part(&mut shared, 1).unwrap(), "24000");
    assert_eq!(GroupTotals::solve_part(&mut shared, 2).unwrap(), "45000");
}

#[test]
fn test_later_part_sees_earlier_mutation() {
    let mut shared = GroupTotals::parse(INPUT).unwrap();
    assert!(matches!(
        GroupTotals::solve_part(&mut shared, 2),
        Err(SolveError::SolveFailed(_))
    ));
    GroupTotals::solve_part(&mut shared, 1).unwrap();
    assert!(GroupTotals::solve_part(&mut shared, 2).is_ok());
}

#[test]
fn test_unknown_part_not_implemented() {
    let mut shared = GroupTotals::parse(INPUT).unwrap();
    assert!(matches!(
        GroupTotals::solve_part(&mut shared, 0),
        Err(SolveError::PartNotImplemented(0))
    ));
    assert!(matches!(
        GroupTotals::solve_part(&mut shared, 3),
        Err(SolveError::PartNotImplemented(3))
    ));
}

#[test]
fn test_parse_error_surfaces() {
    let err = GroupTotals::parse("12\nabc").unwrap_err();
    assert!(err.to_string().contains("abc"));
}

// Borrowed shared data: zero-copy lines
#[derive(AocSolver)]
#[aoc_solver(max_parts = 1)]
struct LongestLine;

impl AocParser for LongestLine {
    type SharedData<'a> = Vec<&'a str>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        Ok(input.lines().collect())
    }
}

impl PartSolver<1> for LongestLine {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .max_by_key(|line| line.len())
            .map(|line| line.to_string())
            .ok_or_else(|| SolveError::failed("empty input"))
    }
}

#[test]
fn test_borrowed_shared_data() {
    let input = String::from("ab\nabcd\nabc");
    let mut shared = LongestLine::parse(&input).unwrap();
    assert_eq!(LongestLine::solve_part(&mut shared, 1).unwrap(), "abcd");
}
