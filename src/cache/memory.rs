//! Memory Tier Module
//!
//! Bounded in-process map combining entry storage with LRU tracking.

use std::collections::HashMap;

use crate::cache::{CacheEntry, LruTracker};

// == Memory Tier ==
/// Bounded key-value store enforcing an entry-count and a byte-cost limit.
///
/// A limit of `0` disables that bound. When either limit is exceeded the least
/// recently used entries are evicted until both hold again.
#[derive(Debug)]
pub struct MemoryTier<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Sum of the costs of all entries
    total_cost: usize,
    /// Maximum number of entries allowed
    max_entry_count: usize,
    /// Maximum total cost allowed
    max_byte_cost: usize,
}

impl<V: Clone> MemoryTier<V> {
    // == Constructor ==
    /// Creates an empty tier with the given limits.
    pub fn new(max_entry_count: usize, max_byte_cost: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            total_cost: 0,
            max_entry_count,
            max_byte_cost,
        }
    }

    // == Get ==
    /// Returns a clone of the value for `key`, marking it most recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let value = self.entries.get(key)?.value.clone();
        self.lru.touch(key);
        Some(value)
    }

    // == Insert ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// Returns the number of other entries evicted to make room. A value whose
    /// cost alone exceeds the byte limit is not retained, and any previous
    /// entry for the key is dropped with it.
    pub fn insert(&mut self, key: &str, value: V, cost: usize) -> usize {
        self.remove(key);

        if self.max_byte_cost > 0 && cost > self.max_byte_cost {
            return 0;
        }

        self.entries
            .insert(key.to_string(), CacheEntry::new(value, cost));
        self.lru.touch(key);
        self.total_cost += cost;

        self.evict_to_limits()
    }

    // == Remove ==
    /// Removes the entry for `key`, returning true if one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.lru.remove(key);
                self.total_cost -= entry.cost;
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.total_cost = 0;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current sum of entry costs.
    pub fn total_cost(&self) -> usize {
        self.total_cost
    }

    fn over_limits(&self) -> bool {
        (self.max_entry_count > 0 && self.entries.len() > self.max_entry_count)
            || (self.max_byte_cost > 0 && self.total_cost > self.max_byte_cost)
    }

    fn evict_to_limits(&mut self) -> usize {
        let mut evicted = 0;
        while self.over_limits() {
            let Some(key) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                self.total_cost -= entry.cost;
                evicted += 1;
            }
        }
        evicted
    }
}
