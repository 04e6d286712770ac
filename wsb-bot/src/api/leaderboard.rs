//! Leaderboard API
//!
//! Serves the same recap and weekly boards the bot posts to chat, as JSON.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use wsb_common::time::today;
use wsb_common::{Recap, Weekly};

use crate::AppState;

/// Query parameters for the weekly board
#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    /// Reference day, defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

/// GET /api/leaderboard/recap
pub async fn get_recap(State(state): State<AppState>) -> Result<Json<Recap>, LeaderboardError> {
    state
        .ctx
        .recap()
        .await
        .map_err(LeaderboardError::from)?
        .map(Json)
        .ok_or(LeaderboardError::NoScores)
}

/// GET /api/leaderboard/weekly
///
/// The window covers the seven editions ending the day before `date`.
pub async fn get_weekly(
    State(state): State<AppState>,
    Query(query): Query<WeeklyQuery>,
) -> Result<Json<Weekly>, LeaderboardError> {
    let date = query.date.unwrap_or_else(today);
    let weekly = state.ctx.weekly(date).await?;
    Ok(Json(weekly))
}

/// Leaderboard API errors
#[derive(Debug)]
pub enum LeaderboardError {
    NoScores,
    StoreUnavailable(String),
}

impl From<wsb_common::Error> for LeaderboardError {
    fn from(e: wsb_common::Error) -> Self {
        warn!(error = %e, "Record store read failed");
        LeaderboardError::StoreUnavailable(e.to_string())
    }
}

impl IntoResponse for LeaderboardError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            LeaderboardError::NoScores => {
                (StatusCode::NOT_FOUND, "No scores recorded yet".to_string())
            }
            LeaderboardError::StoreUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Record store unavailable: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
