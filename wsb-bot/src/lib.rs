//! wsb-bot library - Telegram Wordle score bot
//!
//! Listens to group chats for Wordle result posts, records them in the
//! configured record store and answers leaderboard commands. A weekly
//! leaderboard is posted on a schedule, and an optional status API serves
//! the same boards as JSON.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod handlers;
pub mod render;
pub mod schedule;
pub mod state;
pub mod telegram;

pub use error::{Error, Result};
pub use state::BotContext;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<BotContext>,
}

impl AppState {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self { ctx }
    }
}

/// Build the status API router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/leaderboard/recap", get(api::get_recap))
        .route("/api/leaderboard/weekly", get(api::get_weekly))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
