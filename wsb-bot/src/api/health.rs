//! Health check endpoint
//!
//! Liveness only. The record store is named in the response but never read.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Backend the scores are written to, e.g. `sheet:<id>` or `csv:scores.csv`
    pub store: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "wsb-bot".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.ctx.describe_store(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
