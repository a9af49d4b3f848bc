//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `PUT /set/:key` - Store raw bytes in the data cache
//! - `GET /get/:key` - Retrieve raw bytes by key
//! - `DELETE /del/:key` - Delete a key
//! - `PUT /images/:key`, `GET /images/:key` - Image cache
//! - `POST /clear` - Clear memory, disk or both tiers
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, MAX_VALUE_SIZE};
