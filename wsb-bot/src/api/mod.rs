//! Status API handlers for wsb-bot

pub mod buildinfo;
pub mod health;
pub mod leaderboard;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use leaderboard::{get_recap, get_weekly};
