//! Cache Statistics Module
//!
//! Tracks per-tier hits, misses, evictions and failed disk writes.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered by the memory tier
    pub memory_hits: u64,
    /// Lookups answered by the disk tier and promoted to memory
    pub disk_hits: u64,
    /// Lookups found in neither tier (including undecodable files)
    pub misses: u64,
    /// Entries dropped from memory to respect the configured limits
    pub evictions: u64,
    /// Values that could not be encoded or persisted
    pub write_failures: u64,
    /// Current number of entries in the memory tier
    pub memory_entries: usize,
    /// Current total cost of the memory tier in bytes
    pub memory_cost: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits (either tier) / lookups, or 0.0 if no lookups were made.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.memory_hits + self.disk_hits;
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn record_memory_hit(&mut self) {
        self.memory_hits += 1;
    }

    pub fn record_disk_hit(&mut self) {
        self.disk_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_write_failure(&mut self) {
        self.write_failures += 1;
    }

    // == Update Memory Usage ==
    /// Updates the memory-tier gauges.
    pub fn set_memory_usage(&mut self, entries: usize, cost: usize) {
        self.memory_entries = entries;
        self.memory_cost = cost;
    }
}
