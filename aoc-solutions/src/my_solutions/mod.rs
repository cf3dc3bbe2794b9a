//! Puzzle solutions, one module per year

pub mod year_2021;
pub mod year_2022;
