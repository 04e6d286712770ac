//! wsb-bot - Telegram Wordle score bot
//!
//! Startup order: configuration, logging, record store, Telegram client,
//! then the polling loop alongside the weekly scheduler and the optional
//! status API. Runs until Ctrl+C or SIGTERM.

use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wsb_bot::handlers::run_polling;
use wsb_bot::schedule::{self, WeeklySchedule};
use wsb_bot::telegram::{Messenger, TelegramClient};
use wsb_bot::{build_router, AppState, BotContext};
use wsb_common::config::{resolve_config_path, Config, LoggingConfig};
use wsb_common::store::{self, MemoryStore};
use wsb_common::RecordStore;

/// Command-line arguments for wsb-bot
#[derive(Parser, Debug)]
#[command(name = "wsb-bot")]
#[command(about = "Telegram bot that keeps a Wordle leaderboard")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Telegram bot token (overrides telegram.token)
    #[arg(long, env = "WSB_TELEGRAM_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Google Sheet URL or id (overrides store.sheet_url)
    #[arg(long, env = "WSB_SHEET_URL")]
    sheet_url: Option<String>,

    /// Sheets API access token (overrides store.sheet_token)
    #[arg(long, env = "WSB_SHEET_TOKEN", hide_env_values = true)]
    sheet_token: Option<String>,

    /// Keep scores in memory instead of the configured store
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(token) = &self.token {
            config.telegram.token = Some(token.clone());
        }
        if let Some(url) = &self.sheet_url {
            config.store.sheet_url = Some(url.clone());
        }
        if let Some(token) = &self.sheet_token {
            config.store.sheet_token = Some(token.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config comes first so the log level and file can be taken from it
    let config_path = resolve_config_path(args.config.as_deref());
    let mut config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);

    init_tracing(&config.logging)?;

    info!(
        "Starting Wordle score bot (wsb-bot) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file, running on built-in defaults"),
    }

    config.validate().context("Invalid configuration")?;

    let store: Arc<dyn RecordStore> = if args.dry_run {
        warn!("Dry run: scores are kept in memory and lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        store::open(&config.store).context("Failed to open record store")?
    };

    let token = config
        .telegram
        .token
        .as_deref()
        .ok_or_else(|| anyhow!("No Telegram bot token; set telegram.token or WSB_TELEGRAM_TOKEN"))?;
    let client = Arc::new(
        TelegramClient::new(&config.telegram.api_base, token).context("Failed to create Telegram client")?,
    );

    let ctx = Arc::new(BotContext::from_config(&config, store));

    if let Some(port) = config.http.port {
        let addr: SocketAddr = format!("{}:{}", config.http.bind, port)
            .parse()
            .with_context(|| format!("Invalid status API address {}:{}", config.http.bind, port))?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("Failed to bind status API address")?;
        info!("Status API listening on http://{}", addr);
        info!("Health check: http://{}/health", addr);

        let app = build_router(AppState::new(Arc::clone(&ctx)));
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Status API server error: {}", e);
            }
        });
    }

    let weekly = WeeklySchedule::from_config(&config.schedule);
    let chats = config.telegram.announce_chats.clone();
    if weekly.is_enabled() && !chats.is_empty() {
        let messenger: Arc<dyn Messenger> = client.clone();
        tokio::spawn(schedule::run(Arc::clone(&ctx), messenger, chats, weekly));
    } else {
        info!("Weekly leaderboard post disabled (no announce chats or schedule days)");
    }

    tokio::select! {
        _ = run_polling(ctx, client, config.telegram.poll_timeout_secs) => {},
        _ = shutdown_signal() => {},
    }

    info!("Shutdown complete");
    Ok(())
}

/// Console logging plus an optional plain-text log file
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level {:?}", logging.level))?;

    let file_layer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
