//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, get_image_handler, health_handler,
    set_handler, set_image_handler, stats_handler, AppState,
};

/// Largest request body accepted for a cached value
pub const MAX_VALUE_SIZE: usize = 16 * 1024 * 1024; // 16 MiB

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set/:key` - Store the request body
/// - `GET /get/:key` - Retrieve bytes by key
/// - `DELETE /del/:key` - Delete a key from both tiers
/// - `PUT /images/:key` - Store an image
/// - `GET /images/:key` - Retrieve an image
/// - `POST /clear?tier=memory|disk|all` - Clear a tier of both caches
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/set/:key", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/images/:key", put(set_image_handler).get(get_image_handler))
        .route("/clear", post(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_VALUE_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
