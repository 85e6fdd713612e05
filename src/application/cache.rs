//! Bounded least-recently-used cache for store query results
//!
//! Each [`DashboardService`](super::DashboardService) owns its caches, so
//! there is no process-wide memoization. Entries live until they are evicted
//! by capacity or dropped through [`QueryCache::invalidate`] or
//! [`QueryCache::clear`].

use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::config::CacheCapacity;

/// LRU cache keyed by query parameters.
///
/// Capacities are small (the dashboard default is 2), so entries are kept in
/// a deque ordered from least to most recently used and looked up linearly.
pub struct QueryCache<K, V> {
    capacity: usize,
    entries: Mutex<VecDeque<(K, V)>>,
}

impl<K, V> QueryCache<K, V>
where
    K: PartialEq,
    V: Clone,
{
    pub fn new(capacity: CacheCapacity) -> Self {
        let capacity = capacity.into_inner();
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Look up `key`, marking it most recently used
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        let index = entries.iter().position(|(k, _)| k == key)?;
        let entry = entries.remove(index)?;
        let value = entry.1.clone();
        entries.push_back(entry);
        Some(value)
    }

    /// Store `value`, evicting the least recently used entry when full
    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock();
        if let Some(index) = entries.iter().position(|(k, _)| *k == key) {
            entries.remove(index);
        }
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back((key, value));
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&self, key: &K) -> bool {
        let mut entries = self.entries.lock();
        match entries.iter().position(|(k, _)| k == key) {
            Some(index) => entries.remove(index).is_some(),
            None => false,
        }
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
