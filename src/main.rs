use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homework_bot::config::BotConfig;
use homework_bot::practicum::PracticumHttpClient;
use homework_bot::services::Poller;
use homework_bot::telegram::TelegramNotifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "homework_bot=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The only fatal check: missing credentials halt the process before the
    // loop ever runs.
    let config = match BotConfig::new_from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Startup failed: {}", e);
            return Err(e.into());
        }
    };

    let api = Arc::new(PracticumHttpClient::new(config.practicum_token.clone())?);
    let notifier = Arc::new(TelegramNotifier::new(
        config.telegram_token.clone(),
        config.telegram_chat_id.clone(),
    )?);

    let poller = Poller::new(api, notifier, config.poll_interval_secs);

    tokio::select! {
        _ = poller.start() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received ctrl-c, shutting down");
        }
    }

    Ok(())
}
