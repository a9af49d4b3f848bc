//! Configuration Module
//!
//! Per-cache limits and locations, plus process configuration loaded from
//! environment variables.

use std::env;
use std::path::{Path, PathBuf};

/// Default entry limit for the raw data cache.
pub const DEFAULT_DATA_ENTRY_COUNT: usize = 100;

/// Default entry limit for the image cache.
pub const DEFAULT_IMAGE_ENTRY_COUNT: usize = 50;

/// Default memory budget for either cache.
pub const DEFAULT_MAX_BYTE_COST: usize = 50 * 1024 * 1024; // 50 MiB

/// Subdirectory owned by the raw data cache.
pub const DATA_CACHE_DIR: &str = "DataCache";

/// Subdirectory owned by the image cache.
pub const IMAGE_CACHE_DIR: &str = "ImageCache";

// == Cache Config ==
/// Limits and location of one cache instance.
///
/// Each instance must own its directory; two caches sharing one would see
/// each other's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Upper bound on memory-tier entries (0 = unbounded)
    pub max_entry_count: usize,
    /// Upper bound on memory-tier byte cost (0 = unbounded)
    pub max_byte_cost: usize,
    /// Root of the disk tier
    pub cache_directory: PathBuf,
}

impl CacheConfig {
    /// Config for `cache_directory` with the data cache limits.
    pub fn new(cache_directory: impl Into<PathBuf>) -> Self {
        Self {
            max_entry_count: DEFAULT_DATA_ENTRY_COUNT,
            max_byte_cost: DEFAULT_MAX_BYTE_COST,
            cache_directory: cache_directory.into(),
        }
    }

    /// Raw data cache stored in `<root>/DataCache`.
    pub fn data(root: &Path) -> Self {
        Self::new(root.join(DATA_CACHE_DIR))
    }

    /// Image cache stored in `<root>/ImageCache`.
    pub fn images(root: &Path) -> Self {
        Self::new(root.join(IMAGE_CACHE_DIR)).with_max_entry_count(DEFAULT_IMAGE_ENTRY_COUNT)
    }

    pub fn with_max_entry_count(mut self, max_entry_count: usize) -> Self {
        self.max_entry_count = max_entry_count;
        self
    }

    pub fn with_max_byte_cost(mut self, max_byte_cost: usize) -> Self {
        self.max_byte_cost = max_byte_cost;
        self
    }
}

/// Platform cache directory joined with `tiercache`, or the temp directory
/// when the platform has none.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("tiercache")
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Memory entry limit for the data cache; also the image cache's when set
    pub max_entry_count: Option<usize>,
    /// Memory byte budget for each cache
    pub max_byte_cost: usize,
    /// Directory holding both caches' subdirectories
    pub cache_root: PathBuf,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRY_COUNT` - Memory entry limit (default: 100 data, 50 images)
    /// - `MAX_BYTE_COST` - Memory byte budget per cache (default: 50 MiB)
    /// - `CACHE_ROOT` - Root directory for the disk tiers
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            max_entry_count: env::var("MAX_ENTRY_COUNT")
                .ok()
                .and_then(|v| v.parse().ok()),
            max_byte_cost: env::var("MAX_BYTE_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BYTE_COST),
            cache_root: env::var_os("CACHE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(default_cache_root),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// Config of the raw data cache.
    pub fn data_cache(&self) -> CacheConfig {
        let config = CacheConfig::data(&self.cache_root).with_max_byte_cost(self.max_byte_cost);
        match self.max_entry_count {
            Some(count) => config.with_max_entry_count(count),
            None => config,
        }
    }

    /// Config of the image cache.
    pub fn image_cache(&self) -> CacheConfig {
        let config = CacheConfig::images(&self.cache_root).with_max_byte_cost(self.max_byte_cost);
        match self.max_entry_count {
            Some(count) => config.with_max_entry_count(count),
            None => config,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entry_count: None,
            max_byte_cost: DEFAULT_MAX_BYTE_COST,
            cache_root: default_cache_root(),
            server_port: 3000,
        }
    }
}
