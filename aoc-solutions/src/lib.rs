//! Advent of Code puzzle solutions with automatic registration
//!
//! Solutions are organised by year under [`my_solutions`]. Each one derives
//! `AocSolver` and `AutoRegisterSolver`, so linking this crate is enough for
//! the runner to discover them.

pub mod utils;

#[cfg(feature = "my-solutions")]
pub mod my_solutions;
