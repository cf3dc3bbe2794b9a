//! Memoised evaluation of values that depend on other values (a DAG).
//!
//! - [`DpProblem`]: dependency structure and combine step
//! - [`DpCache`]: single-threaded cache, `RefCell` for interior mutability
//! - [`VecBackend`]: dense `usize` indices
//! - [`HashMapBackend`]: arbitrary hashable indices (search states)
//!
//! **No cycle detection**: the dependency graph must be acyclic.

mod backend;
mod cache;
mod problem;

pub use backend::{Backend, HashMapBackend, VecBackend};
pub use cache::DpCache;
pub use problem::DpProblem;

#[cfg(test)]
mod tests;
