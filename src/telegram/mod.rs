use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BotError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to the configured chat. Best effort; the poll loop logs
    /// a failure and moves on.
    async fn send(&self, text: &str) -> Result<(), BotError>;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BotError::Config(format!("Failed to build http client: {e}")))?;
        Ok(Self {
            client,
            token,
            chat_id,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), BotError> {
        debug!("Sending message to chat {}: {}", self.chat_id, text);
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);

        let response = self
            .client
            .post(&url)
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| BotError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Delivery(format!(
                "Telegram API error {status}: {body}"
            )));
        }

        let parsed: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| BotError::Delivery(e.to_string()))?;
        if !parsed.ok {
            return Err(BotError::Delivery(
                parsed
                    .description
                    .unwrap_or_else(|| "Telegram reported a failure".to_string()),
            ));
        }

        Ok(())
    }
}

pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, _text: &str) -> Result<(), BotError> {
        Ok(())
    }
}
