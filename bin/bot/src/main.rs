use market_relay_bot::telegram::{self, TelegramChannel, TelegramTransport};
use market_relay_bot::{BotConfig, Dispatcher, ListingService, StartupError};
use market_relay_conversation::{FlowController, SessionStore};
use market_relay_locale::Catalog;
use market_relay_publishing::{CancellationHandler, ListingPublisher};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    if let Err(report) = run().await {
        tracing::error!(error = %report, "bot stopped");
        std::process::exit(1);
    }
}

async fn run() -> market_relay_core::Result<(), StartupError> {
    let config = BotConfig::from_env().map_err(|e| StartupError::Config {
        details: e.to_string(),
    })?;
    tracing::info!(channel = %config.channel_handle(), language = %config.bot_language, "Loaded configuration");

    let catalog = Catalog::resolve(config.locales_dir.as_deref(), &config.bot_language)
        .map_err(|e| StartupError::Catalog {
            details: e.to_string(),
        })?;
    let catalog = Arc::new(catalog);

    let poll_timeout = Duration::from_secs(config.poll_timeout_seconds);
    let bot = telegram::bot(&config.telegram_api_url, &config.telegram_bot_token, poll_timeout)
        .map_err(|details| StartupError::Client { details })?;

    let channel = Arc::new(TelegramChannel::new(bot.clone(), config.channel_handle()));
    let service = ListingService::new(
        FlowController::new(Arc::new(SessionStore::new())),
        ListingPublisher::new(channel.clone(), catalog.clone()),
        CancellationHandler::new(channel),
        Arc::new(TelegramTransport::new(bot.clone(), catalog)),
    );
    let dispatcher = Arc::new(Dispatcher::new(service));

    telegram::run_polling(bot, dispatcher.clone(), poll_timeout)
        .await
        .map_err(|e| StartupError::Unreachable {
            details: e.to_string(),
        })?;
    dispatcher.drain().await;
    tracing::info!("Stopped");
    Ok(())
}
