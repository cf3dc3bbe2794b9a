//! Storage backends for the DP cache.

use std::collections::HashMap;
use std::hash::Hash;

/// A storage backend for the DP cache.
///
/// Implementations pick the data structure (Vec, HashMap, ...) that suits
/// the index type.
pub trait Backend<I, K> {
    /// Returns the cached value for `index`, if any.
    fn get(&self, index: &I) -> Option<&K>;

    /// Returns the cached value for `index`, storing `compute()` first if absent.
    ///
    /// `compute` is not called when a value is already present.
    fn get_or_insert(&mut self, index: I, compute: impl FnOnce() -> K) -> &K;
}

/// A Vec-based backend for usize indices.
///
/// Efficient for dense indices starting from 0; grows on demand.
#[derive(Debug)]
pub struct VecBackend<K> {
    data: Vec<Option<K>>,
}

impl<K> VecBackend<K> {
    /// Creates a new empty VecBackend.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates a new VecBackend with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }
}

impl<K> Default for VecBackend<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Backend<usize, K> for VecBackend<K> {
    fn get(&self, index: &usize) -> Option<&K> {
        self.data.get(*index)?.as_ref()
    }

    fn get_or_insert(&mut self, index: usize, compute: impl FnOnce() -> K) -> &K {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
        self.data[index].get_or_insert_with(compute)
    }
}

/// A HashMap-based backend for arbitrary hashable indices.
///
/// Suitable for sparse or composite indices such as search states.
#[derive(Debug)]
pub struct HashMapBackend<I, K> {
    data: HashMap<I, K>,
}

impl<I, K> HashMapBackend<I, K> {
    /// Creates a new empty HashMapBackend.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<I, K> Default for HashMapBackend<I, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Hash + Eq, K> Backend<I, K> for HashMapBackend<I, K> {
    fn get(&self, index: &I) -> Option<&K> {
        self.data.get(index)
    }

    fn get_or_insert(&mut self, index: I, compute: impl FnOnce() -> K) -> &K {
        self.data.entry(index).or_insert_with(compute)
    }
}
