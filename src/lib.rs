//! tiercache - A two-tier key-addressed cache
//!
//! A bounded LRU memory tier backed by a persistent disk tier whose files are
//! named by the MD5 digest of the key, plus an HTTP front end.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{DataCache, ImageCache, KeyAddressedCache};
pub use config::{CacheConfig, Config};
pub use error::CacheError;
