//! Common error types for WSB

use thiserror::Error;

/// Common result type for WSB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the scoring engine and record stores
#[derive(Error, Debug)]
pub enum Error {
    /// Score token outside the seven legal values (`1/6`..`6/6`, `X/6`)
    #[error("Invalid score token: {0:?}")]
    InvalidScoreToken(String),

    /// Stored row that cannot be turned back into an observation
    #[error("Corrupt record at line {line}: {reason}")]
    CorruptRecord { line: usize, reason: String },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error talking to a remote store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote spreadsheet rejected a request
    #[error("Sheet API error {status}: {message}")]
    Sheet { status: u16, message: String },

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
