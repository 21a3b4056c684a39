use std::env;

use crate::error::BotError;

/// Default poll interval in seconds. One interval is deliberately both the
/// poll cadence and the retry backoff after a failed cycle.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub poll_interval_secs: u64,
}

impl BotConfig {
    pub fn new_from_env() -> Result<Self, BotError> {
        let practicum_token = env::var("PRACTICUM_TOKEN")
            .map_err(|_| BotError::Config("PRACTICUM_TOKEN is not set".to_string()))?;
        let telegram_token = env::var("TELEGRAM_TOKEN")
            .map_err(|_| BotError::Config("TELEGRAM_TOKEN is not set".to_string()))?;
        let telegram_chat_id = env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| BotError::Config("TELEGRAM_CHAT_ID is not set".to_string()))?;

        let poll_interval_secs = match env::var("POLL_INTERVAL_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                BotError::Config("POLL_INTERVAL_SECS must be an integer".to_string())
            })?,
            Err(_) => DEFAULT_POLL_INTERVAL_SECS,
        };

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            poll_interval_secs,
        })
    }
}
