//! Cache Entry Module
//!
//! Defines the structure of memory-tier entries.

// == Cache Entry ==
/// A value held by the memory tier together with its byte cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Size charged against the tier's byte budget
    pub cost: usize,
}

impl<V> CacheEntry<V> {
    /// Creates a new cache entry.
    pub fn new(value: V, cost: usize) -> Self {
        Self { value, cost }
    }
}
