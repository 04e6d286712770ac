//! # WSB Common Library
//!
//! Scoring and aggregation engine shared by the Wordle score bot:
//! - Score header parsing
//! - Score token / points conversion
//! - Leaderboard aggregation with tie-inclusive cutoffs
//! - Calendar date to edition resolution
//! - Recap and weekly queries
//! - Record store backends (CSV file, Google Sheets)
//! - Configuration loading

pub mod aggregate;
pub mod config;
pub mod edition;
pub mod error;
pub mod observation;
pub mod parser;
pub mod queries;
pub mod scoring;
pub mod store;
pub mod time;

pub use aggregate::{Aggregator, DedupPolicy, Leaderboard, Standing, DEFAULT_TOP_N};
pub use edition::{EditionAnchor, EditionWindow};
pub use error::{Error, Result};
pub use observation::Observation;
pub use parser::{parse_header, ScoreHeader};
pub use queries::{recap, weekly, EditionBoard, Recap, Weekly};
pub use scoring::{Points, PointsTable, ScoreToken};
pub use store::RecordStore;
