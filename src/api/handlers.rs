//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.
//!
//! Cache calls block on disk I/O, so every handler runs them on tokio's
//! blocking pool and awaits the result.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::{DataCache, Image, ImageCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, CacheStatsResponse, ClearRequest, ClearResponse, ClearTier, DeleteResponse,
    HealthResponse, ImageSetResponse, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Holds one raw data cache and one image cache, each owning its own
/// directory. The caches synchronize internally, so plain `Arc`s suffice.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<DataCache>,
    pub images: Arc<ImageCache>,
}

impl AppState {
    /// Creates a new AppState with the given caches.
    pub fn new(data: DataCache, images: ImageCache) -> Self {
        Self {
            data: Arc::new(data),
            images: Arc::new(images),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DataCache::data(&config.data_cache()),
            ImageCache::images(&config.image_cache()),
        )
    }
}

/// Runs a blocking cache call off the async worker threads.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| CacheError::Internal(format!("cache worker failed: {err}")))
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(msg) => Err(CacheError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

/// Handler for PUT /set/:key
///
/// Stores the raw request body in the data cache.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<SetResponse>> {
    check_key(&key)?;

    let len = body.len();
    let cache = state.data.clone();
    let cache_key = key.clone();
    run_blocking(move || cache.set(&cache_key, body.to_vec())).await?;

    Ok(Json(SetResponse::new(key, len)))
}

/// Handler for GET /get/:key
///
/// Returns the cached bytes from either tier.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    check_key(&key)?;

    let cache = state.data.clone();
    let cache_key = key.clone();
    match run_blocking(move || cache.get(&cache_key)).await? {
        Some(bytes) => Ok((
            [(header::CONTENT_TYPE, "application/octet-stream")],
            bytes,
        )
            .into_response()),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Removes a key from both tiers of the data cache.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    check_key(&key)?;

    let cache = state.data.clone();
    let cache_key = key.clone();
    run_blocking(move || cache.remove(&cache_key)).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for PUT /images/:key
///
/// The body must be a PNG, JPEG or GIF; anything else is rejected.
pub async fn set_image_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<ImageSetResponse>> {
    check_key(&key)?;

    let image = Image::decode(body.to_vec())
        .map(Arc::new)
        .map_err(|err| CacheError::InvalidRequest(err.to_string()))?;
    let response = ImageSetResponse::new(key.clone(), &image);

    let cache = state.images.clone();
    run_blocking(move || cache.set(&key, image)).await?;

    Ok(Json(response))
}

/// Handler for GET /images/:key
///
/// Returns the image bytes with a content type matching their format.
pub async fn get_image_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    check_key(&key)?;

    let cache = state.images.clone();
    let cache_key = key.clone();
    match run_blocking(move || cache.get(&cache_key)).await? {
        Some(image) => Ok((
            [(header::CONTENT_TYPE, image.content_type())],
            image.as_bytes().to_vec(),
        )
            .into_response()),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for POST /clear
///
/// Clears the requested tier of both caches.
pub async fn clear_handler(
    State(state): State<AppState>,
    Query(req): Query<ClearRequest>,
) -> Result<Json<ClearResponse>> {
    let tier = req.tier;
    run_blocking(move || match tier {
        ClearTier::Memory => {
            state.data.clear_memory();
            state.images.clear_memory();
        }
        ClearTier::Disk => {
            state.data.clear_disk();
            state.images.clear_disk();
        }
        ClearTier::All => {
            state.data.clear_all();
            state.images.clear_all();
        }
    })
    .await?;

    tracing::info!(?tier, "cache cleared");
    Ok(Json(ClearResponse::new(tier)))
}

/// Handler for GET /stats
///
/// Returns counters and disk usage for both caches.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let response = run_blocking(move || StatsResponse {
        data: CacheStatsResponse::new(&state.data.stats(), state.data.disk_usage_bytes()),
        images: CacheStatsResponse::new(&state.images.stats(), state.images.disk_usage_bytes()),
    })
    .await?;

    Ok(Json(response))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
