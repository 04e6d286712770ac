//! Error types for wsb-bot

use thiserror::Error;

/// Main error type for the bot service
#[derive(Error, Debug)]
pub enum Error {
    /// Telegram answered with `ok: false`
    #[error("Telegram API error ({code:?}): {description}")]
    Telegram {
        code: Option<u16>,
        description: String,
    },

    /// Network or decoding failure talking to Telegram
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Record store or scoring failure
    #[error(transparent)]
    Core(#[from] wsb_common::Error),

    /// Missing or invalid startup settings
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type using the bot Error
pub type Result<T> = std::result::Result<T, Error>;
