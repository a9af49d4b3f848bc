//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::io::Cursor;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use image::{DynamicImage, ImageFormat};
use serde_json::Value;
use tempfile::{tempdir, TempDir};
use tiercache::{api::create_router, AppState, CacheConfig, DataCache, ImageCache};
use tower::ServiceExt;

// == Helper Functions ==

fn open_state(dir: &TempDir) -> AppState {
    AppState::new(
        DataCache::data(&CacheConfig::data(dir.path())),
        ImageCache::images(&CacheConfig::images(dir.path())),
    )
}

fn create_test_app() -> (TempDir, Router) {
    let dir = tempdir().unwrap();
    let app = create_router(open_state(&dir));
    (dir, app)
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

fn put(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn encoded_image(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::new_rgb8(width, height);
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

fn png(width: u32, height: u32) -> Vec<u8> {
    encoded_image(ImageFormat::Png, width, height)
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let (_dir, app) = create_test_app();

    let response = app.oneshot(put("/set/test_key", "test_value")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("test_key"));
    assert_eq!(json["bytes"], 10);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let (_dir, app) = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put("/set/img:42", vec![1u8, 2, 3]))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get("/get/img:42")).await.unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    assert_eq!(
        get_response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    assert_eq!(body_bytes(get_response.into_body()).await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let (_dir, app) = create_test_app();

    let response = app.oneshot(get("/get/nonexistent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_percent_encoded_url_key() {
    let (_dir, app) = create_test_app();
    let uri = "/set/https%3A%2F%2Fexample.com%2Fa.png";

    app.clone().oneshot(put(uri, "payload")).await.unwrap();

    let response = app
        .oneshot(get("/get/https%3A%2F%2Fexample.com%2Fa.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, b"payload".to_vec());
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint() {
    let (_dir, app) = create_test_app();

    app.clone().oneshot(put("/set/del_key", "v")).await.unwrap();

    let delete_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/del/del_key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(delete_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get("/get/del_key")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}

// == Image Endpoint Tests ==

#[tokio::test]
async fn test_image_round_trip() {
    let (_dir, app) = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put("/images/avatar", png(64, 32)))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);
    let json = body_to_json(set_response.into_body()).await;
    assert_eq!(json["format"], "png");
    assert_eq!(json["width"], 64);
    assert_eq!(json["height"], 32);

    let get_response = app.oneshot(get("/images/avatar")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);
    assert_eq!(get_response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(get_response.into_body()).await, png(64, 32));
}

#[tokio::test]
async fn test_image_rejects_non_image_body() {
    let (_dir, app) = create_test_app();

    let response = app
        .oneshot(put("/images/avatar", "not an image"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_image_accepts_webp_and_bmp() {
    let (_dir, app) = create_test_app();

    for (key, format, mime) in [
        ("webp", ImageFormat::WebP, "image/webp"),
        ("bmp", ImageFormat::Bmp, "image/bmp"),
    ] {
        let bytes = encoded_image(format, 5, 4);

        let set_response = app
            .clone()
            .oneshot(put(&format!("/images/{key}"), bytes.clone()))
            .await
            .unwrap();
        assert_eq!(set_response.status(), StatusCode::OK, "{key}");
        let json = body_to_json(set_response.into_body()).await;
        assert_eq!(json["format"], key);
        assert_eq!(json["width"], 5);

        let get_response = app
            .clone()
            .oneshot(get(&format!("/images/{key}")))
            .await
            .unwrap();
        assert_eq!(get_response.headers()[header::CONTENT_TYPE], mime);
        assert_eq!(body_bytes(get_response.into_body()).await, bytes);
    }
}

#[tokio::test]
async fn test_image_and_data_caches_are_isolated() {
    let (_dir, app) = create_test_app();

    app.clone()
        .oneshot(put("/images/shared", png(1, 1)))
        .await
        .unwrap();

    let response = app.oneshot(get("/get/shared")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Clear Endpoint Tests ==

#[tokio::test]
async fn test_clear_memory_then_disk() {
    let dir = tempdir().unwrap();
    let state = open_state(&dir);
    let app = create_router(state.clone());

    app.clone().oneshot(put("/set/k", "v")).await.unwrap();

    let response = app.clone().oneshot(post("/clear?tier=memory")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.data.memory_len(), 0);

    // still served from disk
    let response = app.clone().oneshot(get("/get/k")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(post("/clear?tier=disk")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.data.disk_usage_bytes(), 0);

    // the promoted memory copy survives a disk clear
    let response = app.clone().oneshot(get("/get/k")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(post("/clear")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["tier"], "all");

    let response = app.oneshot(get("/get/k")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Stats & Health Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let (_dir, app) = create_test_app();

    app.clone().oneshot(put("/set/a", vec![0u8; 100])).await.unwrap();
    app.clone().oneshot(get("/get/a")).await.unwrap();
    app.clone().oneshot(get("/get/missing")).await.unwrap();

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["data"]["memory_hits"], 1);
    assert_eq!(json["data"]["misses"], 1);
    assert_eq!(json["data"]["memory_entries"], 1);
    assert_eq!(json["data"]["disk_usage_bytes"], 100);
    assert_eq!(json["data"]["hit_rate"], 0.5);
    assert_eq!(json["images"]["memory_entries"], 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_key_too_long() {
    let (_dir, app) = create_test_app();
    let uri = format!("/set/{}", "k".repeat(300));

    let response = app.oneshot(put(&uri, "v")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_unknown_route() {
    let (_dir, app) = create_test_app();

    let response = app.oneshot(get("/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
