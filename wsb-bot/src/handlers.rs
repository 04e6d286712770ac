//! Update dispatch: bot commands and the score listener

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use wsb_common::observation::derive_user_id;
use wsb_common::time::{from_unix_seconds, today};
use wsb_common::{parse_header, Observation};

use crate::error::Result;
use crate::render::{render_recap, render_weekly};
use crate::state::BotContext;
use crate::telegram::{next_offset, Message, Messenger, TelegramClient, Update};

/// Delay before polling again after a failed getUpdates
const RETRY_DELAY_SECS: u64 = 5;

pub const START_TEXT: &str = "Wordle score bot started!";

pub const HELP_TEXT: &str = "Post your Wordle result and I'll keep score.\n\n\
/recap - leaderboards for the last two Wordles\n\
/weekly - leaderboard for the past seven Wordles\n\
/help - this message";

pub const NO_SCORES_TEXT: &str = "No scores recorded yet.";

pub const STORE_UNAVAILABLE_TEXT: &str = "Sorry, I can't reach the score sheet right now.";

/// Commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Recap,
    Weekly,
}

/// Parse a bot command, ignoring any `@botname` suffix and arguments
pub fn parse_command(text: &str) -> Option<Command> {
    let word = text.strip_prefix('/')?.split_whitespace().next()?;
    let name = word.split('@').next()?;
    match name {
        "start" => Some(Command::Start),
        "help" => Some(Command::Help),
        "recap" => Some(Command::Recap),
        "weekly" => Some(Command::Weekly),
        _ => None,
    }
}

/// Handle one update
///
/// `today` is the UTC date used for the weekly window.
pub async fn handle_update(
    ctx: &BotContext,
    messenger: &dyn Messenger,
    update: &Update,
    today: NaiveDate,
) -> Result<()> {
    let Some(message) = &update.message else {
        return Ok(());
    };
    let Some(text) = message.text.as_deref() else {
        return Ok(());
    };

    match parse_command(text) {
        Some(command) => answer_command(ctx, messenger, message.chat.id, command, today).await,
        None => record_score(ctx, message, text).await,
    }
}

async fn answer_command(
    ctx: &BotContext,
    messenger: &dyn Messenger,
    chat_id: i64,
    command: Command,
    today: NaiveDate,
) -> Result<()> {
    debug!(chat_id, ?command, "Command received");

    let reply = match command {
        Command::Start => Ok(START_TEXT.to_string()),
        Command::Help => Ok(HELP_TEXT.to_string()),
        Command::Recap => ctx.recap().await.map(|recap| match recap {
            Some(recap) => render_recap(&recap, ctx.points_table()),
            None => NO_SCORES_TEXT.to_string(),
        }),
        Command::Weekly => ctx.weekly(today).await.map(|weekly| render_weekly(&weekly)),
    };

    match reply {
        Ok(text) => messenger.send_message(chat_id, &text).await,
        Err(e) => {
            messenger.send_message(chat_id, STORE_UNAVAILABLE_TEXT).await?;
            Err(e.into())
        }
    }
}

/// Record the message as a score if it starts with a score header
async fn record_score(ctx: &BotContext, message: &Message, text: &str) -> Result<()> {
    let Some(header) = parse_header(text) else {
        return Ok(());
    };
    let Some(from) = &message.from else {
        debug!(chat_id = message.chat.id, "Score report without sender ignored");
        return Ok(());
    };

    let user_id = derive_user_id(from.username.as_deref(), &from.first_name, from.last_name.as_deref());
    let observation = Observation::from_header(from_unix_seconds(message.date), user_id, header);
    ctx.record(&observation).await?;

    info!(
        user = %observation.user_id,
        edition = observation.edition,
        score = %observation.score,
        "Recorded score"
    );
    Ok(())
}

/// Long-poll Telegram forever, dispatching every update
///
/// Failures are logged; a failed poll is retried after a short delay and a
/// failed update is skipped.
pub async fn run_polling(ctx: Arc<BotContext>, client: Arc<TelegramClient>, poll_timeout_secs: u64) {
    let mut offset = 0;
    info!(poll_timeout_secs, "Polling for updates");

    loop {
        let updates = match client.get_updates(offset, poll_timeout_secs).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "getUpdates failed, retrying in {}s", RETRY_DELAY_SECS);
                tokio::time::sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
                continue;
            }
        };

        offset = next_offset(offset, &updates);
        for update in &updates {
            if let Err(e) = handle_update(&ctx, client.as_ref(), update, today()).await {
                warn!(update_id = update.update_id, error = %e, "Update handling failed");
            }
        }
    }
}
