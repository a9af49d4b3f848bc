//! Cache Store Module
//!
//! Two-tier key-addressed cache: a bounded memory tier in front of a
//! persistent disk tier.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::cache::key::is_valid_key;
use crate::cache::{BytesCodec, CacheStats, Codec, DiskTier, ImageCodec, MemoryTier};
use crate::config::CacheConfig;

// == Write Tracker ==
/// Serializes mutations of the disk tier and counts them, so a `get` can tell
/// whether its disk read overlapped a write.
#[derive(Debug, Default)]
struct WriteTracker {
    serial: Mutex<()>,
    started: AtomicU64,
    finished: AtomicU64,
}

/// Holds the writer slot; marks the mutation finished when dropped.
struct WriteGuard<'a> {
    tracker: &'a WriteTracker,
    _serial: MutexGuard<'a, ()>,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.tracker.finished.fetch_add(1, Ordering::SeqCst);
    }
}

impl WriteTracker {
    fn begin(&self) -> WriteGuard<'_> {
        let serial = self.serial.lock();
        self.started.fetch_add(1, Ordering::SeqCst);
        WriteGuard {
            tracker: self,
            _serial: serial,
        }
    }

    /// Current generation, or `None` while a write is in flight.
    fn quiet_generation(&self) -> Option<u64> {
        let started = self.started.load(Ordering::SeqCst);
        let finished = self.finished.load(Ordering::SeqCst);
        (started == finished).then_some(started)
    }

    fn unchanged_since(&self, generation: u64) -> bool {
        self.started.load(Ordering::SeqCst) == generation
    }
}

// == Key-Addressed Cache ==
/// Maps string keys to values, checking memory first and falling back to disk.
///
/// No operation reports an error: failures degrade to a miss (reads) or a
/// stale/absent disk copy (writes). Disk I/O is synchronous and runs outside
/// the memory lock; async callers should move calls onto a blocking pool.
pub struct KeyAddressedCache<C: Codec> {
    codec: C,
    memory: Mutex<MemoryTier<C::Value>>,
    disk: DiskTier,
    writes: WriteTracker,
    stats: Mutex<CacheStats>,
}

/// Cache of raw byte payloads.
pub type DataCache = KeyAddressedCache<BytesCodec>;

/// Cache of decoded images.
pub type ImageCache = KeyAddressedCache<ImageCodec>;

impl<C: Codec> KeyAddressedCache<C> {
    // == Constructor ==
    /// Creates a cache using `config`, creating its directory if needed.
    pub fn new(config: &CacheConfig, codec: C) -> Self {
        debug!(
            dir = %config.cache_directory.display(),
            max_entry_count = config.max_entry_count,
            max_byte_cost = config.max_byte_cost,
            "opening cache"
        );
        Self {
            codec,
            memory: Mutex::new(MemoryTier::new(
                config.max_entry_count,
                config.max_byte_cost,
            )),
            disk: DiskTier::open(&config.cache_directory),
            writes: WriteTracker::default(),
            stats: Mutex::new(CacheStats::new()),
        }
    }

    // == Get ==
    /// Returns the value for `key`, promoting disk hits into memory.
    ///
    /// Missing, unreadable and undecodable entries are all reported as `None`.
    pub fn get(&self, key: &str) -> Option<C::Value> {
        if !is_valid_key(key) {
            self.stats.lock().record_miss();
            return None;
        }

        if let Some(value) = self.memory.lock().get(key) {
            self.stats.lock().record_memory_hit();
            return Some(value);
        }

        let generation = self.writes.quiet_generation();
        let Some(bytes) = self.disk.read(key) else {
            self.stats.lock().record_miss();
            return None;
        };

        let value = match self.codec.decode(&bytes) {
            Ok(value) => value,
            Err(err) => {
                debug!(key, error = %err, "undecodable cache file treated as miss");
                self.stats.lock().record_miss();
                return None;
            }
        };

        // Bytes read while a write was in flight may already be stale.
        let evicted = {
            let mut memory = self.memory.lock();
            let current = generation.is_some_and(|start| self.writes.unchanged_since(start));
            if !current || memory.contains(key) {
                0
            } else {
                memory.insert(key, value.clone(), bytes.len())
            }
        };

        let mut stats = self.stats.lock();
        stats.record_disk_hit();
        stats.record_evictions(evicted);
        Some(value)
    }

    // == Set ==
    /// Stores `value` in memory, then persists its encoding to disk.
    ///
    /// Encode and write failures are logged and swallowed; the memory copy
    /// stays valid either way.
    pub fn set(&self, key: &str, value: C::Value) {
        if !is_valid_key(key) {
            debug!("ignoring set with empty key");
            return;
        }

        let _write = self.writes.begin();
        let encoded = self.codec.encode(&value);
        let cost = match &encoded {
            Ok(bytes) => bytes.len(),
            Err(_) => self.codec.cost(&value),
        };

        let evicted = self.memory.lock().insert(key, value, cost);
        self.stats.lock().record_evictions(evicted);

        let result = encoded.and_then(|bytes| self.disk.write(key, &bytes));
        if let Err(err) = result {
            warn!(key, error = %err, "failed to persist cache entry");
            self.stats.lock().record_write_failure();
        }
    }

    // == Remove ==
    /// Deletes `key` from both tiers.
    pub fn remove(&self, key: &str) {
        if !is_valid_key(key) {
            return;
        }
        let _write = self.writes.begin();
        self.memory.lock().remove(key);
        self.disk.remove(key);
    }

    // == Clear ==
    /// Drops every memory entry; the disk tier is untouched.
    pub fn clear_memory(&self) {
        self.memory.lock().clear();
    }

    /// Deletes and recreates the disk directory; the memory tier is untouched.
    pub fn clear_disk(&self) {
        let _write = self.writes.begin();
        if let Err(err) = self.disk.clear() {
            warn!(
                dir = %self.disk.root().display(),
                error = %err,
                "failed to clear disk cache"
            );
        }
    }

    /// Clears both tiers.
    pub fn clear_all(&self) {
        self.clear_memory();
        self.clear_disk();
    }

    // == Single-Tier Access ==
    /// Memory-only lookup; never touches the disk.
    pub fn peek_memory(&self, key: &str) -> Option<C::Value> {
        self.memory.lock().get(key)
    }

    /// Raw bytes stored on disk for `key`, bypassing decoding and memory.
    pub fn read_disk(&self, key: &str) -> Option<Vec<u8>> {
        if !is_valid_key(key) {
            return None;
        }
        self.disk.read(key)
    }

    /// Writes raw bytes for `key` straight to disk.
    ///
    /// Any memory copy of the key is dropped so the next `get` reads these
    /// bytes back through the codec.
    pub fn write_disk(&self, key: &str, bytes: &[u8]) {
        if !is_valid_key(key) {
            return;
        }
        let _write = self.writes.begin();
        self.memory.lock().remove(key);
        if let Err(err) = self.disk.write(key, bytes) {
            warn!(key, error = %err, "failed to write cache file");
            self.stats.lock().record_write_failure();
        }
    }

    // == Introspection ==
    /// Total size of the files in the disk tier. Advisory only.
    pub fn disk_usage_bytes(&self) -> u64 {
        self.disk.usage_bytes()
    }

    /// Number of entries currently held in memory.
    pub fn memory_len(&self) -> usize {
        self.memory.lock().len()
    }

    pub fn cache_directory(&self) -> &Path {
        self.disk.root()
    }

    /// Snapshot of the counters together with current memory usage.
    pub fn stats(&self) -> CacheStats {
        let (entries, cost) = {
            let memory = self.memory.lock();
            (memory.len(), memory.total_cost())
        };
        let mut stats = self.stats.lock().clone();
        stats.set_memory_usage(entries, cost);
        stats
    }
}

impl DataCache {
    /// Raw byte cache using `config`.
    pub fn data(config: &CacheConfig) -> Self {
        Self::new(config, BytesCodec)
    }
}

impl ImageCache {
    /// Image cache using `config`.
    pub fn images(config: &CacheConfig) -> Self {
        Self::new(config, ImageCodec)
    }
}
