pub mod response;
pub mod statuses;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::info;

use crate::error::BotError;

pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

// The upstream imposes no timeout; this one keeps a hung connection from
// stalling the loop forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait PracticumApi: Send + Sync {
    /// Fetch homework statuses changed since `from_date` (epoch seconds).
    /// A zero or negative `from_date` means "from the current time".
    async fn fetch(&self, from_date: i64) -> Result<Value, BotError>;
}

pub struct PracticumHttpClient {
    client: Client,
    token: String,
}

impl PracticumHttpClient {
    pub fn new(token: String) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BotError::Config(format!("Failed to build http client: {e}")))?;
        Ok(Self { client, token })
    }
}

#[async_trait]
impl PracticumApi for PracticumHttpClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, BotError> {
        let from_date = if from_date > 0 {
            from_date
        } else {
            Utc::now().timestamp()
        };
        info!("Requesting homework statuses (from_date={})", from_date);

        let response = self
            .client
            .get(ENDPOINT)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let reason = status.canonical_reason().unwrap_or("unknown").to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::HttpStatus {
                code: status.as_u16(),
                reason,
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| BotError::Decode(e.to_string()))
    }
}
