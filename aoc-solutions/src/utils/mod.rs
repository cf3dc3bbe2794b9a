//! Helpers shared across solutions

pub mod dp_cache;
pub mod parse;
