//! Tests for the DP cache module.

use std::cell::Cell;
use std::rc::Rc;

use super::*;

struct Fibonacci;

impl DpProblem<usize, u64> for Fibonacci {
    fn deps(&self, n: &usize) -> Vec<usize> {
        if *n <= 1 { vec![] } else { vec![n - 1, n - 2] }
    }

    fn compute(&self, n: &usize, deps: Vec<u64>) -> u64 {
        if *n <= 1 { *n as u64 } else { deps[0] + deps[1] }
    }
}

#[test]
fn test_fibonacci_vec_backend() {
    let cache = DpCache::with_problem(VecBackend::new(), Fibonacci);
    assert_eq!(cache.get(&0), 0);
    assert_eq!(cache.get(&1), 1);
    assert_eq!(cache.get(&10), 55);
    assert_eq!(cache.get(&90), 2_880_067_194_370_816_120);
}

/// Diamond: 0 -> {1, 2}, 1 -> 3, 2 -> 3
struct Diamond {
    computed: Rc<Cell<usize>>,
}

impl DpProblem<usize, u32> for Diamond {
    fn deps(&self, n: &usize) -> Vec<usize> {
        match n {
            0 => vec![1, 2],
            1 | 2 => vec![3],
            _ => vec![],
        }
    }

    fn compute(&self, _n: &usize, deps: Vec<u32>) -> u32 {
        self.computed.set(self.computed.get() + 1);
        deps.iter().sum::<u32>().max(1)
    }
}

#[test]
fn test_diamond_computes_each_index_once() {
    let computed = Rc::new(Cell::new(0));
    let cache = DpCache::with_problem(
        HashMapBackend::new(),
        Diamond {
            computed: computed.clone(),
        },
    );

    assert_eq!(cache.get(&0), 2);
    assert_eq!(computed.get(), 4);

    // Cached: no recomputation
    assert_eq!(cache.get(&0), 2);
    assert_eq!(cache.get(&3), 1);
    assert_eq!(computed.get(), 4);
    assert_eq!(cache.into_backend().len(), 4);
}

/// Grid paths keyed by a tuple: paths from (0, 0) moving right/down
struct GridPaths;

impl DpProblem<(usize, usize), u64> for GridPaths {
    fn deps(&self, &(r, c): &(usize, usize)) -> Vec<(usize, usize)> {
        let mut deps = Vec::new();
        if r > 0 {
            deps.push((r - 1, c));
        }
        if c > 0 {
            deps.push((r, c - 1));
        }
        deps
    }

    fn compute(&self, _pos: &(usize, usize), deps: Vec<u64>) -> u64 {
        if deps.is_empty() { 1 } else { deps.iter().sum() }
    }
}

#[test]
fn test_tuple_index_hashmap_backend() {
    let cache = DpCache::with_problem(HashMapBackend::new(), GridPaths);
    assert_eq!(cache.get(&(4, 4)), 70);
    assert_eq!(cache.get(&(2, 3)), 10);
}

#[test]
fn test_backend_get_or_insert_keeps_first_value() {
    let mut backend = VecBackend::with_capacity(4);
    assert_eq!(Backend::<usize, i32>::get(&backend, &3), None);
    assert_eq!(*backend.get_or_insert(3, || 7), 7);
    assert_eq!(*backend.get_or_insert(3, || 9), 7);
    assert_eq!(backend.get(&3), Some(&7));
    assert_eq!(backend.get(&1), None);
}
