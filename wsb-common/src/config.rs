//! Configuration loading and config file resolution
//!
//! The bot is configured from a single TOML file. Every field has a built-in
//! default, so a missing file only produces a warning. Secrets (bot token,
//! sheet credentials) are usually supplied through the environment by the
//! service binary and merged on top.

use std::path::{Path, PathBuf};

use chrono::{NaiveTime, Weekday};
use serde::Deserialize;
use tracing::{info, warn};

use crate::aggregate::{DedupPolicy, DEFAULT_TOP_N};
use crate::edition::EditionAnchor;
use crate::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "WSB_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub store: StoreConfig,
    pub anchor: EditionAnchor,
    pub leaderboard: LeaderboardConfig,
    pub schedule: ScheduleConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Telegram Bot API settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub api_base: String,
    /// Long-poll timeout passed to getUpdates
    pub poll_timeout_secs: u64,
    /// Chats that receive the scheduled weekly leaderboard
    pub announce_chats: Vec<i64>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 30,
            announce_chats: Vec::new(),
        }
    }
}

/// Which record store backs the bot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Csv,
    Sheet,
}

/// Record store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub csv_path: PathBuf,
    pub sheet_url: Option<String>,
    /// OAuth bearer token for the Sheets API
    pub sheet_token: Option<String>,
    pub sheet_range: String,
    /// With the sheet backend, also append every score to the CSV file (on by default)
    pub local_mirror: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Csv,
            csv_path: PathBuf::from("scores.csv"),
            sheet_url: None,
            sheet_token: None,
            sheet_range: "Sheet1".to_string(),
            local_mirror: true,
        }
    }
}

/// Leaderboard settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub top_n: usize,
    pub dedup: DedupPolicy,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            dedup: DedupPolicy::None,
        }
    }
}

/// When the weekly leaderboard is posted (UTC)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Empty disables the weekly post
    pub days: Vec<Weekday>,
    pub time: NaiveTime,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            days: vec![Weekday::Fri],
            time: NaiveTime::from_hms_opt(4, 0, 0).unwrap_or_default(),
        }
    }
}

/// Status API settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    /// The status API is only served when a port is set
    pub port: Option<u16>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file path (logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from `path`, falling back to defaults
    ///
    /// A missing file is not an error; a file that exists but does not parse is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            warn!("No config file found, using built-in defaults");
            return Ok(Self::default());
        };

        match std::fs::read_to_string(path) {
            Ok(content) => {
                info!("Loading config from {}", path.display());
                Self::from_toml_str(&content)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config file {} not found, using built-in defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reject settings that cannot work together
    pub fn validate(&self) -> Result<()> {
        if self.leaderboard.top_n == 0 {
            return Err(Error::Config("leaderboard.top_n must be at least 1".to_string()));
        }
        if self.store.backend == StoreBackend::Sheet {
            if self.store.sheet_url.as_deref().map_or(true, str::is_empty) {
                return Err(Error::Config("store.sheet_url is required for the sheet backend".to_string()));
            }
            if self.store.sheet_token.as_deref().map_or(true, str::is_empty) {
                return Err(Error::Config("store.sheet_token is required for the sheet backend".to_string()));
            }
        }
        if self.schedule.days.is_empty() {
            info!("No schedule days configured, weekly leaderboard post disabled");
        }
        Ok(())
    }
}

/// Config file resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `WSB_CONFIG` environment variable
/// 3. `<user config dir>/wsb/config.toml`, if it exists
/// 4. `./wsb.toml`, if it exists
///
/// Returns `None` when nothing is found; the caller then runs on defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    if let Some(user_config) = dirs::config_dir().map(|d| d.join("wsb").join("config.toml")) {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    let local = PathBuf::from("wsb.toml");
    local.exists().then_some(local)
}
