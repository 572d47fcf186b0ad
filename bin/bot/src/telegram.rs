//! Telegram Bot API front end.
//!
//! Long-polls for updates with teloxide, translates them into dialog events
//! and hands them to the [`Dispatcher`]. Replies and channel posts go back
//! out through the same [`Bot`].

pub mod channel;
pub mod transport;
pub mod updates;

pub use channel::TelegramChannel;
pub use transport::TelegramTransport;

use crate::dispatcher::Dispatcher;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use teloxide::Bot;
use teloxide::dispatching::{Dispatcher as UpdateDispatcher, UpdateHandler};
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::types::{AllowedUpdate, Update};
use teloxide::update_listeners::Polling;
use tracing::info;

/// Extra time a request may take beyond the long-polling timeout.
const REQUEST_GRACE: Duration = Duration::from_secs(10);

/// Builds a bot client for `api_url`.
///
/// Requests time out [`REQUEST_GRACE`] after `poll_timeout`, so a long poll
/// is never cut short by the client.
///
/// # Errors
///
/// Returns an error if `api_url` is not a valid URL or the HTTP client
/// cannot be built.
pub fn bot(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Bot, String> {
    let url = reqwest::Url::parse(api_url).map_err(|e| format!("invalid API URL: {e}"))?;
    let client = teloxide::net::default_reqwest_settings()
        .timeout(poll_timeout + REQUEST_GRACE)
        .build()
        .map_err(|e| e.to_string())?;
    Ok(Bot::with_client(token, client).set_api_url(url))
}

/// Polls for updates until Ctrl-C is received.
///
/// Every update is acknowledged, whether or not it produced an event. Poll
/// failures are logged and retried with teloxide's backoff. Returns once
/// updates already received have been handed to `dispatcher`.
///
/// # Errors
///
/// Returns an error if the bot cannot reach the Bot API at startup.
pub async fn run_polling(
    bot: Bot,
    dispatcher: Arc<Dispatcher>,
    poll_timeout: Duration,
) -> Result<(), teloxide::RequestError> {
    let listener = Polling::builder(bot.clone())
        .timeout(poll_timeout)
        .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery])
        .build();
    info!(timeout_secs = poll_timeout.as_secs(), "polling for updates");

    UpdateDispatcher::builder(bot, handler())
        .dependencies(dptree::deps![dispatcher])
        .enable_ctrlc_handler()
        .build()
        .try_dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("failed to poll for updates"),
        )
        .await?;

    info!("polling stopped");
    Ok(())
}

fn handler() -> UpdateHandler<Infallible> {
    dptree::entry().endpoint(forward)
}

async fn forward(update: Update, dispatcher: Arc<Dispatcher>) -> Result<(), Infallible> {
    if let Some(event) = updates::into_event(update) {
        dispatcher.dispatch(event).await;
    }
    Ok(())
}
