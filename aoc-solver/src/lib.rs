//! Advent of Code Solver Library
//!
//! A flexible and type-safe framework for solving Advent of Code problems across multiple years and days.
//! Each problem is implemented as a solver with custom input parsing and can produce results
//! for multiple parts.
//!
//! # Overview
//!
//! This library provides:
//! - A trait-based interface for defining solvers ([`AocParser`], [`PartSolver`], [`Solver`])
//! - Type-erased solver instances with parse/solve timing ([`DynSolver`])
//! - A registry mapping year/day to solver factories ([`SolverRegistry`])
//! - Link-time plugin discovery through `inventory` ([`SolverPlugin`])
//!
//! # Quick Example
//!
//! ```
//! use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverRegistryBuilder, register_solver};
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 1)]
//! pub struct MyDay1;
//!
//! impl AocParser for MyDay1 {
//!     type SharedData<'a> = Vec<i32>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input.lines()
//!             .map(|line| line.parse().map_err(|_|
//!                 ParseError::InvalidFormat("Expected integer".to_string())))
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for MyDay1 {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().sum::<i32>().to_string())
//!     }
//! }
//!
//! let mut builder = SolverRegistryBuilder::new();
//! register_solver!(builder, MyDay1, 2023, 1);
//! let registry = builder.build();
//!
//! let mut solver = registry.create_solver(2023, 1, "1\n2\n3").unwrap();
//! let result = solver.solve(1).unwrap();
//! assert_eq!(result.answer, "6");
//! ```
//!
//! # Plugin System
//!
//! Use `#[derive(AutoRegisterSolver)]` to register solvers at link time:
//! ```ignore
//! #[derive(AocSolver, AutoRegisterSolver)]
//! #[aoc_solver(max_parts = 2)]
//! #[aoc(year = 2022, day = 4, tags = ["2022"])]
//! struct Solver;
//! ```
//!
//! Parts of one instance share the parsed data mutably, so part 2 can reuse
//! anything part 1 cached in it.

mod error;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use instance::{DynSolver, SolveResult, SolverInstance, Timing};
pub use registry::{
    FactoryInfo, RegisterableSolver, SolverFactory, SolverFactoryStorage, SolverPlugin,
    SolverRegistry, SolverRegistryBuilder,
};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Re-export inventory for use by the derive macro
pub use inventory;

pub use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
