//! Single-threaded DP cache implementation.

use std::cell::RefCell;
use std::marker::PhantomData;

use super::backend::Backend;
use super::problem::DpProblem;

/// A dynamic programming cache with lazy evaluation and dependency resolution.
///
/// Each index is computed at most once; dependencies are resolved
/// recursively before the index itself.
///
/// # Warning: No Cycle Detection
///
/// Cyclic dependencies recurse without bound. Callers must ensure the
/// dependency graph is a DAG.
///
/// # Example
///
/// ```rust
/// use aoc_solutions::utils::dp_cache::{DpCache, DpProblem, VecBackend};
///
/// struct Factorial;
///
/// impl DpProblem<usize, u64> for Factorial {
///     fn deps(&self, n: &usize) -> Vec<usize> {
///         if *n == 0 { vec![] } else { vec![n - 1] }
///     }
///     fn compute(&self, n: &usize, deps: Vec<u64>) -> u64 {
///         if *n == 0 { 1 } else { (*n as u64) * deps[0] }
///     }
/// }
///
/// let cache = DpCache::with_problem(VecBackend::new(), Factorial);
/// assert_eq!(cache.get(&5), 120);
/// ```
pub struct DpCache<I, K, B, P>
where
    B: Backend<I, K>,
    P: DpProblem<I, K>,
{
    backend: RefCell<B>,
    problem: P,
    _phantom: PhantomData<(I, K)>,
}

impl<I, K, B, P> DpCache<I, K, B, P>
where
    I: Clone,
    K: Clone,
    B: Backend<I, K>,
    P: DpProblem<I, K>,
{
    /// Creates a new DpCache with the given backend and problem definition.
    pub fn with_problem(backend: B, problem: P) -> Self {
        Self {
            backend: RefCell::new(backend),
            problem,
            _phantom: PhantomData,
        }
    }

    /// Access the problem definition.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Retrieves the value for the given index, computing it if necessary.
    pub fn get(&self, index: &I) -> K {
        if let Some(value) = self.backend.borrow().get(index) {
            return value.clone();
        }

        // No borrow is held while dependencies resolve
        let deps = self.problem.deps(index);
        let dep_values: Vec<K> = deps.into_iter().map(|dep| self.get(&dep)).collect();

        self.backend
            .borrow_mut()
            .get_or_insert(index.clone(), || self.problem.compute(index, dep_values))
            .clone()
    }

    /// Consumes the cache, returning the backend with every computed value.
    pub fn into_backend(self) -> B {
        self.backend.into_inner()
    }
}
