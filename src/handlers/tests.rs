use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::dataset::{Dataset, DatasetSource, DatasetStore};
use crate::models::{TelemetryRecord, UptimeUnit};
use crate::{create_router, AppState};

fn router_with(store: DatasetStore) -> Router {
    create_router(AppState {
        datasets: Arc::new(store),
        config: Config::default(),
    })
}

fn embedded_router() -> Router {
    router_with(DatasetStore::open(DatasetSource::Embedded))
}

fn unavailable_router() -> Router {
    router_with(DatasetStore::open(DatasetSource::Csv {
        path: "/nonexistent/telemetry.csv".into(),
        unit: UptimeUnit::Ratio,
    }))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.expect("body bytes");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}

#[tokio::test]
async fn test_root_banner() {
    let (status, body) = send(embedded_router(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Latency Analytics API" }));
}

#[tokio::test]
async fn test_latency_uses_default_threshold() {
    let request = post_json("/api/latency", json!({ "regions": ["apac", "americas"] }));
    let (status, body) = send(embedded_router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["apac"],
        json!({ "avg_latency": 166.8, "p95_latency": 196.05, "avg_uptime": 0.984, "breaches": 4 })
    );
    assert_eq!(body["americas"]["breaches"], json!(0));
}

#[tokio::test]
async fn test_latency_with_explicit_threshold() {
    let dataset = Dataset::new(
        vec![
            TelemetryRecord::new("apac", 115.34, 0.99405),
            TelemetryRecord::new("apac", 134.67, 0.98733),
        ],
        "test",
    );
    let router = router_with(DatasetStore::from_dataset(DatasetSource::Embedded, dataset));

    let request = post_json("/api/latency", json!({ "regions": ["apac", "emea"], "threshold_ms": 120 }));
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apac"]["avg_latency"], json!(125.01));
    assert_eq!(body["apac"]["avg_uptime"], json!(0.9907));
    assert_eq!(body["apac"]["breaches"], json!(1));
    assert_eq!(body["emea"], json!({ "error": "Region emea not found" }));
}

#[tokio::test]
async fn test_latency_empty_regions() {
    let (status, body) = send(embedded_router(), post_json("/api/latency", json!({ "regions": [] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_latency_rejects_malformed_body() {
    let request = post_json("/api/latency", json!({ "threshold_ms": 120 }));
    let (status, body) = send(embedded_router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], json!(400));
}

#[tokio::test]
async fn test_latency_rejects_too_many_regions() {
    let regions: Vec<String> = (0..100).map(|i| format!("region-{}", i)).collect();
    let request = post_json("/api/latency", json!({ "regions": regions }));
    let (status, _) = send(embedded_router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_latency_unavailable_dataset() {
    let request = post_json("/api/latency", json!({ "regions": ["apac"] }));
    let (status, body) = send(unavailable_router(), request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn test_health_reports_dataset_state() {
    let (status, body) = send(embedded_router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["dataset"]["records"], json!(30));

    let (status, body) = send(unavailable_router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("degraded"));
    assert!(body["dataset"]["error"].is_string());
}

#[tokio::test]
async fn test_regions_listing() {
    let (status, body) = send(embedded_router(), get("/api/regions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "region": "apac", "records": 10 },
            { "region": "emea", "records": 10 },
            { "region": "americas", "records": 10 },
        ])
    );
}

#[tokio::test]
async fn test_reload_endpoint() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/dataset/reload")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(embedded_router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], json!(30));
    assert_eq!(body["regions"], json!(3));
    assert_eq!(body["source"], json!("embedded"));
}

#[tokio::test]
async fn test_reload_failure_is_unavailable() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/dataset/reload")
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(unavailable_router(), request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/latency")
        .header(header::ORIGIN, "https://dashboard.example.com")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "regions": ["emea"] }).to_string()))
        .expect("request");

    let response = embedded_router().oneshot(request).await.expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
