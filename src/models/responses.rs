//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, Image};
use crate::models::ClearTier;

/// Response body for the SET operations (PUT /set/:key, PUT /images/:key)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// Size of the stored payload
    pub bytes: usize,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>, bytes: usize) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
            bytes,
        }
    }
}

/// Response body for PUT /images/:key
#[derive(Debug, Clone, Serialize)]
pub struct ImageSetResponse {
    #[serde(flatten)]
    pub stored: SetResponse,
    pub format: &'static str,
    pub width: u32,
    pub height: u32,
}

impl ImageSetResponse {
    pub fn new(key: impl Into<String>, image: &Image) -> Self {
        Self {
            stored: SetResponse::new(key, image.as_bytes().len()),
            format: image.format_name(),
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for POST /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub tier: String,
}

impl ClearResponse {
    pub fn new(tier: ClearTier) -> Self {
        let tier = match tier {
            ClearTier::Memory => "memory",
            ClearTier::Disk => "disk",
            ClearTier::All => "all",
        };
        Self {
            message: format!("Cleared {} tier", tier),
            tier: tier.to_string(),
        }
    }
}

/// Statistics of one cache instance
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub memory_hits: u64,
    pub disk_hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub write_failures: u64,
    pub memory_entries: usize,
    pub memory_cost: usize,
    /// Advisory size of the disk tier
    pub disk_usage_bytes: u64,
    /// (memory_hits + disk_hits) / lookups
    pub hit_rate: f64,
}

impl CacheStatsResponse {
    /// Creates a new CacheStatsResponse from cache statistics
    pub fn new(stats: &CacheStats, disk_usage_bytes: u64) -> Self {
        Self {
            memory_hits: stats.memory_hits,
            disk_hits: stats.disk_hits,
            misses: stats.misses,
            evictions: stats.evictions,
            write_failures: stats.write_failures,
            memory_entries: stats.memory_entries,
            memory_cost: stats.memory_cost,
            disk_usage_bytes,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub data: CacheStatsResponse,
    pub images: CacheStatsResponse,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
