//! Codec Module
//!
//! Conversion between cached values and the raw bytes kept on disk.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, Result};

// == Codec Trait ==
/// Serializes values for the disk tier and restores them on a disk hit.
///
/// Disk files carry the encoded bytes verbatim, with no header, so changing
/// an encoding silently turns existing files into misses.
pub trait Codec: Send + Sync + 'static {
    /// Value type held by the memory tier and returned to callers.
    type Value: Clone + Send + Sync + 'static;

    fn encode(&self, value: &Self::Value) -> Result<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Value>;

    /// Bytes charged against the memory tier's cost limit.
    fn cost(&self, value: &Self::Value) -> usize {
        self.encode(value).map(|bytes| bytes.len()).unwrap_or(0)
    }
}

// == Raw Bytes ==
/// Identity codec for raw byte payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl Codec for BytesCodec {
    type Value = Vec<u8>;

    fn encode(&self, value: &Vec<u8>) -> Result<Vec<u8>> {
        Ok(value.clone())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        Ok(bytes.to_vec())
    }

    fn cost(&self, value: &Vec<u8>) -> usize {
        value.len()
    }
}

// == JSON ==
/// Stores any serde value as JSON.
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonCodec").finish()
    }
}

impl<T> Codec for JsonCodec<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Value = T;

    fn encode(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|err| CacheError::Encode(err.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|err| CacheError::Decode(err.to_string()))
    }
}
