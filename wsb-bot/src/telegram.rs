//! Telegram Bot API client
//!
//! Only the pieces the bot needs: long-polling `getUpdates` and
//! `sendMessage`. Message payloads are decoded into a minimal subset of the
//! Bot API types.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};

/// Extra slack on top of the long-poll timeout before the HTTP request gives up
const POLL_GRACE_SECS: u64 = 10;
const SEND_TIMEOUT_SECS: u64 = 30;

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    /// Unix time the message was sent
    pub date: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// Outbound chat messages
///
/// Implemented by [`TelegramClient`]; handlers and the scheduler only depend
/// on this so they can be exercised without a network.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send an HTML-formatted message to a chat
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
}

pub struct TelegramClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(Error::Config("Telegram bot token is empty".to_string()));
        }
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self {
            http_client,
            base_url: format!("{}/bot{}", api_base.trim_end_matches('/'), token.trim()),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
        timeout: Duration,
    ) -> Result<T> {
        // The URL embeds the token, so only the method name is logged
        debug!(method, "Telegram API call");

        let response: ApiResponse<T> = self
            .http_client
            .post(format!("{}/{}", self.base_url, method))
            .timeout(timeout)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                description,
                error_code,
                ..
            } => Err(Error::Telegram {
                code: error_code,
                description: description.unwrap_or_else(|| format!("{} failed", method)),
            }),
        }
    }

    /// Long-poll for updates newer than `offset`
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"],
            }),
            Duration::from_secs(timeout_secs + POLL_GRACE_SECS),
        )
        .await
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let _sent: Message = self
            .call(
                "sendMessage",
                json!({
                    "chat_id": chat_id,
                    "text": text,
                    "parse_mode": "HTML",
                    "disable_web_page_preview": true,
                }),
                Duration::from_secs(SEND_TIMEOUT_SECS),
            )
            .await?;
        Ok(())
    }
}

/// Offset for the next `getUpdates` call
pub fn next_offset(current: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .map_or(current, |next| next.max(current))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPDATES: &str = r#"{
        "ok": true,
        "result": [
            {
                "update_id": 1001,
                "message": {
                    "message_id": 7,
                    "date": 1644654600,
                    "chat": { "id": -100200, "type": "group", "title": "Wordlers" },
                    "from": { "id": 55, "is_bot": false, "first_name": "Alice", "username": "alice" },
                    "text": "Wordle 238 4/6\n\n⬛🟨⬛⬛⬛"
                }
            },
            {
                "update_id": 1002,
                "edited_message": { "message_id": 7, "date": 1644654600, "chat": { "id": -100200 } }
            }
        ]
    }"#;

    #[test]
    fn test_decode_updates() {
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(UPDATES).unwrap();
        assert!(response.ok);
        let updates = response.result.unwrap();
        assert_eq!(updates.len(), 2);

        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, -100200);
        assert_eq!(message.from.as_ref().unwrap().username.as_deref(), Some("alice"));
        assert!(message.text.as_deref().unwrap().starts_with("Wordle 238 4/6"));
        assert!(updates[1].message.is_none());
    }

    #[test]
    fn test_decode_error_response() {
        let response: ApiResponse<Vec<Update>> =
            serde_json::from_str(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#).unwrap();
        assert!(!response.ok);
        assert_eq!(response.error_code, Some(401));
        assert_eq!(response.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn test_next_offset() {
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(UPDATES).unwrap();
        let updates = response.result.unwrap();
        assert_eq!(next_offset(0, &updates), 1003);
        assert_eq!(next_offset(5000, &updates), 5000);
        assert_eq!(next_offset(42, &[]), 42);
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            TelegramClient::new("https://api.telegram.org", "  "),
            Err(Error::Config(_))
        ));
    }
}
