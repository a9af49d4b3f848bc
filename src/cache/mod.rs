//! Cache Module
//!
//! Two-tier key-addressed caching: a bounded LRU memory tier in front of a
//! digest-addressed disk tier.

mod codec;
mod disk;
mod entry;
mod image;
pub mod key;
mod lru;
mod memory;
mod stats;
mod store;


// Re-export public types
pub use codec::{BytesCodec, Codec, JsonCodec};
pub use disk::DiskTier;
pub use entry::CacheEntry;
pub use self::image::{Image, ImageCodec, ImageFormat};
pub use lru::LruTracker;
pub use memory::MemoryTier;
pub use stats::CacheStats;
pub use store::{DataCache, ImageCache, KeyAddressedCache};
