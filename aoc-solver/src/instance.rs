//! Parsed puzzle instances and their timings

use crate::error::{ParseError, SolveError};
use crate::solver::{Solver, SolverExt};
use chrono::{DateTime, TimeDelta, Utc};

/// Wall-clock interval (UTC) spent parsing or solving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Timing {
    /// Run `f`, recording when it started and finished
    pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Timing) {
        let start = Utc::now();
        let value = f();
        let end = Utc::now();
        (value, Timing { start, end })
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Answer to one part
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub part: u8,
    pub answer: String,
    pub timing: Timing,
}

impl SolveResult {
    pub fn duration(&self) -> TimeDelta {
        self.timing.duration()
    }
}

/// One puzzle input parsed by `S`
///
/// Parts are solved against the same shared data, so a part may reuse
/// whatever an earlier part stored there.
pub struct SolverInstance<'a, S: Solver> {
    year: u16,
    day: u8,
    shared: S::SharedData<'a>,
    parse: Timing,
}

impl<'a, S: Solver> SolverInstance<'a, S> {
    /// Parse `input`, recording how long it took
    pub fn new(year: u16, day: u8, input: &'a str) -> Result<Self, ParseError> {
        let (shared, parse) = Timing::measure(|| S::parse(input));
        Ok(Self {
            year,
            day,
            shared: shared?,
            parse,
        })
    }
}

/// Type-erased view of a [`SolverInstance`], as produced by the registry
///
/// ```no_run
/// use aoc_solver::DynSolver;
///
/// fn report(solver: &mut dyn DynSolver) -> Result<(), aoc_solver::SolveError> {
///     for part in 1..=solver.parts() {
///         let result = solver.solve(part)?;
///         println!("{}/{:02} part {}: {}", solver.year(), solver.day(), result.part, result.answer);
///     }
///     println!("parse took {}", solver.parse_duration());
///     Ok(())
/// }
/// ```
pub trait DynSolver {
    /// Solve `part` against the shared data, timing it
    fn solve(&mut self, part: u8) -> Result<SolveResult, SolveError>;

    fn parse_timing(&self) -> Timing;

    fn year(&self) -> u16;

    fn day(&self) -> u8;

    /// Number of parts this solver supports
    fn parts(&self) -> u8;

    fn parse_duration(&self) -> TimeDelta {
        self.parse_timing().duration()
    }
}

impl<'a, S: SolverExt> DynSolver for SolverInstance<'a, S> {
    fn solve(&mut self, part: u8) -> Result<SolveResult, SolveError> {
        let (answer, timing) =
            Timing::measure(|| S::solve_part_checked_range(&mut self.shared, part));
        Ok(SolveResult {
            part,
            answer: answer?,
            timing,
        })
    }

    fn parse_timing(&self) -> Timing {
        self.parse
    }

    fn year(&self) -> u16 {
        self.year
    }

    fn day(&self) -> u8 {
        self.day
    }

    fn parts(&self) -> u8 {
        S::PARTS
    }
}
