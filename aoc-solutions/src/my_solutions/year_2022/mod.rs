//! Advent of Code 2022

pub mod day_3;
pub mod day_4;
pub mod day_8;
pub mod day_9;
pub mod day_10;
pub mod day_13;
pub mod day_16;
pub mod day_17;
pub mod day_19;
pub mod day_20;
pub mod day_23;
pub mod day_25;
