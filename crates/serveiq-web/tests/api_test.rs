//! Router-level tests for the query API.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use serveiq_db::{ConnectionState, InferenceStore};
use serveiq_test_utils::{object_id, record, records, FailingStore, MemoryStore};
use serveiq_test_utils::pretty_assertions::assert_eq;
use serveiq_web::{router::build_router, state::AppState};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(store: Arc<dyn InferenceStore>) -> Router {
    build_router(AppState::new(store, ConnectionState::Connected))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn upload_times(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|r| r["upload_time"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_returns_all_records_newest_first_when_under_limit() {
    let store = Arc::new(MemoryStore::new(vec![
        record(1, 1_700_000_100),
        record(2, 1_700_000_300),
        record(3, 1_700_000_200),
    ]));

    let (status, body) = get(app_with(store.clone()), "/api/data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(upload_times(&body), vec![1_700_000_300, 1_700_000_200, 1_700_000_100]);
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn test_caps_at_twenty_largest_upload_times() {
    let all = records(50);
    let mut expected: Vec<i64> = all.iter().map(|r| r.upload_time).collect();
    expected.sort_unstable_by(|a, b| b.cmp(a));
    expected.truncate(20);

    let (status, body) = get(app_with(Arc::new(MemoryStore::new(all))), "/api/data").await;

    assert_eq!(status, StatusCode::OK);
    let times = upload_times(&body);
    assert_eq!(times.len(), 20);
    assert!(times.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(times, expected);
}

#[tokio::test]
async fn test_empty_store_returns_empty_array() {
    let (status, body) = get(app_with(Arc::new(MemoryStore::default())), "/api/data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let (status, body) = get(app_with(Arc::new(FailingStore)), "/api/data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Database error" }));
}

#[tokio::test]
async fn test_records_use_stored_field_names() {
    let store = Arc::new(MemoryStore::new(vec![record(7, 1_700_000_000)]));
    let (_, body) = get(app_with(store), "/api/data").await;

    let first = &body[0];
    assert_eq!(first["_id"], json!(object_id(7)));
    assert_eq!(first["location"], json!("Site 7"));
    assert_eq!(first["detected_objects"], json!([["Garbage", 90]]));
    assert_eq!(first["summary"], json!({ "Garbage": 1 }));
    assert!(first.get("image").is_none());
}

#[tokio::test]
async fn test_count_endpoint() {
    let (status, body) = get(app_with(Arc::new(MemoryStore::new(records(42)))), "/api/data/count").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "count": 42 }));

    let (status, body) = get(app_with(Arc::new(FailingStore)), "/api/data/count").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Database error" }));
}

#[tokio::test]
async fn test_item_lookup() {
    let store: Arc<dyn InferenceStore> = Arc::new(MemoryStore::new(records(3)));

    let (status, body) = get(app_with(store.clone()), &format!("/api/data/{}", object_id(2))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], json!(object_id(2)));

    let (status, body) = get(app_with(store.clone()), &format!("/api/data/{}", object_id(99))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Item not found" }));

    let (status, body) = get(app_with(store), "/api/data/xyz").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid id" }));
}

#[tokio::test]
async fn test_health_reflects_handshake() {
    let store: Arc<dyn InferenceStore> = Arc::new(MemoryStore::default());

    let (status, body) = get(app_with(store.clone()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "database": "connected" }));

    let failed = build_router(AppState::new(store, ConnectionState::Failed("refused".into())));
    let (status, body) = get(failed, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "status": "degraded", "database": "failed" }));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let req = Request::builder()
        .method("GET")
        .uri("/api/data")
        .header("origin", "http://dashboard.example")
        .body(Body::empty())
        .unwrap();
    let res = app_with(Arc::new(MemoryStore::default())).oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}
