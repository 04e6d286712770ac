//! Integration tests for the status API
//!
//! Tests cover:
//! - Health and build info endpoints
//! - Recap board (404 before any score, 200 with two editions)
//! - Weekly board for an explicit reference date
//! - 503 when the record store cannot be read

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::DateTime;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method
use wsb_bot::{build_router, AppState, BotContext};
use wsb_common::store::{MemoryStore, RecordStore};
use wsb_common::{Aggregator, EditionAnchor, Observation, ScoreToken, DEFAULT_TOP_N};

/// Test helper: Build an app over an in-memory store
fn setup_app(observations: Vec<Observation>) -> axum::Router {
    setup_app_with_store(Arc::new(MemoryStore::with_observations(observations)))
}

fn setup_app_with_store(store: Arc<dyn RecordStore>) -> axum::Router {
    let ctx = BotContext::new(store, Aggregator::default(), EditionAnchor::default(), DEFAULT_TOP_N);
    build_router(AppState::new(Arc::new(ctx)))
}

fn obs(user: &str, edition: u32, score: ScoreToken) -> Observation {
    let ts = DateTime::parse_from_rfc3339("2022-02-20T09:00:00+00:00").unwrap();
    Observation::new(ts, user, edition, score)
}

fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Store whose backend is always down
struct UnreachableStore;

#[async_trait]
impl RecordStore for UnreachableStore {
    async fn append(&self, _observation: &Observation) -> wsb_common::Result<()> {
        Err(unavailable())
    }

    async fn read_all(&self) -> wsb_common::Result<Vec<Observation>> {
        Err(unavailable())
    }

    fn describe(&self) -> String {
        "unreachable".to_string()
    }
}

fn unavailable() -> wsb_common::Error {
    wsb_common::Error::Sheet {
        status: 503,
        message: "backend unavailable".to_string(),
    }
}

// =============================================================================
// Health / build info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(Vec::new());

    let response = app.oneshot(test_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "wsb-bot");
    assert!(body["version"].is_string());
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_health_ignores_store_outage() {
    let app = setup_app_with_store(Arc::new(UnreachableStore));

    let response = app.oneshot(test_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["store"], "unreachable");
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let app = setup_app(Vec::new());

    let response = app.oneshot(test_request("/api/buildinfo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(body["git_hash"].is_string());
    assert!(body["build_timestamp"].is_string());
}

// =============================================================================
// Recap
// =============================================================================

#[tokio::test]
async fn test_recap_without_scores_is_not_found() {
    let app = setup_app(Vec::new());

    let response = app.oneshot(test_request("/api/leaderboard/recap")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_recap_boards() {
    let app = setup_app(vec![
        obs("alice", 238, ScoreToken::Three),
        obs("bob", 238, ScoreToken::Failed),
        obs("alice", 239, ScoreToken::Two),
    ]);

    let response = app.oneshot(test_request("/api/leaderboard/recap")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body,
        json!({
            "previous": {
                "edition": 238,
                "leaderboard": [
                    { "user_id": "alice", "points": 4 },
                    { "user_id": "bob", "points": 0.5 },
                ],
            },
            "latest": {
                "edition": 239,
                "leaderboard": [
                    { "user_id": "alice", "points": 5 },
                ],
            },
        })
    );
}

#[tokio::test]
async fn test_recap_store_unavailable() {
    let app = setup_app_with_store(Arc::new(UnreachableStore));

    let response = app.oneshot(test_request("/api/leaderboard/recap")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("backend unavailable"));
}

// =============================================================================
// Weekly
// =============================================================================

#[tokio::test]
async fn test_weekly_for_date() {
    // 2022-02-22 is ten days after the anchor: window 241..=247
    let app = setup_app(vec![
        obs("alice", 240, ScoreToken::One),
        obs("alice", 241, ScoreToken::Four),
        obs("bob", 247, ScoreToken::Two),
        obs("carol", 248, ScoreToken::One),
        obs("bob", 245, ScoreToken::Six),
    ]);

    let response = app
        .oneshot(test_request("/api/leaderboard/weekly?date=2022-02-22"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["window"], json!({ "start": 241, "end": 247 }));
    assert_eq!(
        body["leaderboard"],
        json!([
            { "user_id": "bob", "points": 6 },
            { "user_id": "alice", "points": 3 },
        ])
    );
}

#[tokio::test]
async fn test_weekly_rejects_bad_date() {
    let app = setup_app(Vec::new());

    let response = app
        .oneshot(test_request("/api/leaderboard/weekly?date=last-friday"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_weekly_store_unavailable() {
    let app = setup_app_with_store(Arc::new(UnreachableStore));

    let response = app
        .oneshot(test_request("/api/leaderboard/weekly?date=2022-02-22"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
