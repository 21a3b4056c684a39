use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::BotError;
use crate::practicum::{PracticumApi, response};
use crate::telegram::Notifier;

pub const NO_NEW_WORK_MESSAGE: &str = "Нет новых работ на проверку :(";

/// Outcome of one poll cycle. "No new submissions" is a normal result, not a
/// fault; failures carry the error that aborted the cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    StatusChanged(String),
    NoNewWork,
    Failed(BotError),
}

/// Polls the homework API on a fixed interval and forwards status changes to
/// the chat. Owns the fetch cursor and the single-slot dedup cache; every
/// per-cycle failure is contained here.
pub struct Poller {
    api: Arc<dyn PracticumApi>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    cursor: i64,
    last_sent: Option<String>,
}

impl Poller {
    pub fn new(api: Arc<dyn PracticumApi>, notifier: Arc<dyn Notifier>, interval_secs: u64) -> Self {
        Self {
            api,
            notifier,
            interval: Duration::from_secs(interval_secs),
            cursor: Utc::now().timestamp(),
            last_sent: None,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_sent(&self) -> Option<&str> {
        self.last_sent.as_deref()
    }

    /// Run cycles forever. The sleep is unconditional and doubles as the
    /// retry backoff; a failed cycle waits exactly as long as a clean one.
    pub async fn start(mut self) {
        info!("Starting homework poller (interval: {:?})", self.interval);

        loop {
            self.tick().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One cycle without the sleep: fetch, validate, parse, then decide
    /// whether the rendered message goes out.
    pub async fn tick(&mut self) {
        let outcome = self.run_cycle().await;
        self.dispatch(&outcome).await;
    }

    /// Fetch and interpret one poll window. The cursor advances to the
    /// server's `current_date` only when fetch, validation, and (when a
    /// record is present) parsing all succeed; any failure leaves it
    /// unchanged so the next cycle re-queries the same window.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let response = match self.api.fetch(self.cursor).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Fetch failed: {}", e);
                return CycleOutcome::Failed(e);
            }
        };

        let homeworks = match response::check_response(&response) {
            Ok(list) => list,
            Err(e) => {
                warn!("Response validation failed: {}", e);
                return CycleOutcome::Failed(e);
            }
        };

        // Only the first record (newest submission) is consumed per cycle.
        let outcome = match homeworks.first() {
            Some(record) => match response::parse_status(record) {
                Ok(message) => CycleOutcome::StatusChanged(message),
                Err(e) => {
                    warn!("Failed to parse homework record: {}", e);
                    return CycleOutcome::Failed(e);
                }
            },
            None => {
                info!("No new homeworks since {}", self.cursor);
                CycleOutcome::NoNewWork
            }
        };

        self.advance_cursor(&response);
        outcome
    }

    /// Render the outcome, suppress if it matches the last sent message,
    /// otherwise cache it and send. Failure messages share the cache slot
    /// with status messages, so a repeating fault is reported once.
    pub async fn dispatch(&mut self, outcome: &CycleOutcome) {
        let message = render(outcome);

        if self.last_sent.as_deref() == Some(message.as_str()) {
            debug!("Message unchanged, suppressing: {}", message);
            return;
        }

        self.last_sent = Some(message.clone());
        if let Err(e) = self.notifier.send(&message).await {
            error!("Failed to deliver message: {}", e);
        }
    }

    fn advance_cursor(&mut self, response: &Value) {
        match response::current_date(response) {
            Some(next) => self.cursor = next,
            // Keep the previous cursor and re-query the same window.
            None => warn!("Response has no usable current_date, keeping cursor"),
        }
    }
}

fn render(outcome: &CycleOutcome) -> String {
    match outcome {
        CycleOutcome::StatusChanged(message) => message.clone(),
        CycleOutcome::NoNewWork => NO_NEW_WORK_MESSAGE.to_string(),
        CycleOutcome::Failed(e) => format!("Сбой в работе телеграмм-бота: {e}"),
    }
}
