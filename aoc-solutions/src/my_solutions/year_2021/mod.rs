//! Advent of Code 2021

pub mod day_19;
