//! End-to-end tests for the recommendation API.
//!
//! These tests run the real router against a mock upstream snapshot
//! endpoint and verify the three boundary outcomes: success, invalid
//! payload, and upstream unavailable.

use std::sync::Arc;

use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use server::{router, AppState, Config};

// ============================================================================
// Test Fixtures
// ============================================================================

fn sample_snapshot() -> Value {
    json!({
        "success": true,
        "data": {
            "users": [
                { "id": "u1", "age": 30, "gender": "true" },
                { "id": "u2", "age": 25, "gender": "false" },
            ],
            "products": [
                { "id": "p1", "productVariantId": "p1", "name": "Tee",
                  "category": "shirts", "brand": "acme", "material": "cotton",
                  "feature": "plain", "price": 10.0 },
                { "id": "p2", "productVariantId": "p2", "name": "Jeans",
                  "category": "pants", "brand": "acme", "material": "denim",
                  "feature": "slim", "price": 40.0 },
                { "id": "p3", "productVariantId": "p3", "name": "Polo",
                  "category": "shirts", "brand": "acme", "material": "cotton",
                  "feature": "plain", "price": 15.0 },
            ],
            "orderHistories": [
                { "clientId": "u1", "productVariantId": "p1", "quantity": 2,
                  "purchaseTimestamp": 1700000000000i64 },
                { "clientId": "u1", "productVariantId": "p2", "quantity": 1,
                  "purchaseTimestamp": 1700000100000i64 },
                { "clientId": "u2", "productVariantId": "p1", "quantity": 1,
                  "purchaseTimestamp": 1700000200000i64 },
                { "clientId": "u2", "productVariantId": "p3", "quantity": 3,
                  "purchaseTimestamp": 1700000300000i64 },
            ]
        }
    })
}

/// Serve a fixed snapshot payload on a random port.
async fn start_mock_upstream(payload: Value) -> (String, tokio::task::JoinHandle<()>) {
    let payload = Arc::new(payload);
    let app = Router::new().route(
        "/recommender/data",
        get(move || {
            let payload = payload.clone();
            async move { Json((*payload).clone()) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock upstream");
    let addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock upstream failed");
    });

    (format!("http://{}", addr), handle)
}

/// Start the recommendation service pointed at the given upstream.
async fn start_app(base_url: String) -> (String, tokio::task::JoinHandle<()>) {
    let config = Config {
        base_url,
        num_recommendations: 2,
        bind_addr: "127.0.0.1:0".to_string(),
        snapshot_cache: false,
    };
    let app = router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind app server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("App server failed");
    });

    (format!("http://{}", addr), handle)
}

/// An address nothing is listening on.
async fn dead_upstream_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Failed to get local address");
    drop(listener);
    format!("http://{}", addr)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_recommendations_for_known_user() {
    let (upstream_url, upstream) = start_mock_upstream(sample_snapshot()).await;
    let (app_url, app) = start_app(upstream_url).await;

    let response = reqwest::get(format!("{}/api/recommendations/u1", app_url))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["success"], json!(true));
    // u1 and u2 share p1; p3 is the only recommendable product
    assert_eq!(body["recommendations"], json!(["p3"]));

    upstream.abort();
    app.abort();
}

#[tokio::test]
async fn test_unknown_user_gets_empty_list() {
    let (upstream_url, upstream) = start_mock_upstream(sample_snapshot()).await;
    let (app_url, app) = start_app(upstream_url).await;

    let response = reqwest::get(format!("{}/api/recommendations/nobody", app_url))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["recommendations"], json!([]));

    upstream.abort();
    app.abort();
}

#[tokio::test]
async fn test_unsuccessful_snapshot_is_invalid_input() {
    let payload = json!({ "success": false, "data": null });
    let (upstream_url, upstream) = start_mock_upstream(payload).await;
    let (app_url, app) = start_app(upstream_url).await;

    let response = reqwest::get(format!("{}/api/recommendations/u1", app_url))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["recommendations"], json!([]));

    upstream.abort();
    app.abort();
}

#[tokio::test]
async fn test_missing_section_is_invalid_input() {
    let payload = json!({
        "success": true,
        "data": { "users": [], "products": [] }
    });
    let (upstream_url, upstream) = start_mock_upstream(payload).await;
    let (app_url, app) = start_app(upstream_url).await;

    let response = reqwest::get(format!("{}/api/recommendations/u1", app_url))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 400);

    upstream.abort();
    app.abort();
}

#[tokio::test]
async fn test_unreachable_upstream_is_service_unavailable() {
    let (app_url, app) = start_app(dead_upstream_url().await).await;

    let response = reqwest::get(format!("{}/api/recommendations/u1", app_url))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 503);

    let body: Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["recommendations"], json!([]));

    app.abort();
}
