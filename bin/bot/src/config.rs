//! Centralized bot configuration.
//!
//! Loaded via the `config` crate from environment variables, after
//! `dotenvy` has merged any `.env` file into the process environment.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Bot configuration.
#[derive(Clone, Deserialize)]
pub struct BotConfig {
    /// Bot API token (`TELEGRAM_BOT_TOKEN`).
    pub telegram_bot_token: String,

    /// Channel listings are posted to, with or without a leading `@`
    /// (`CHANNEL_USERNAME`).
    pub channel_username: String,

    /// Language of user-visible messages (`BOT_LANGUAGE`).
    #[serde(default = "default_bot_language")]
    pub bot_language: String,

    /// Directory of `<language>.json` message catalogs (`LOCALES_DIR`).
    #[serde(default)]
    pub locales_dir: Option<PathBuf>,

    /// Bot API base URL (`TELEGRAM_API_URL`).
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Long-polling timeout in seconds (`POLL_TIMEOUT_SECONDS`).
    #[serde(default = "default_poll_timeout_seconds")]
    pub poll_timeout_seconds: u64,
}

fn default_bot_language() -> String {
    market_relay_locale::DEFAULT_LANGUAGE.to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout_seconds() -> u64 {
    30
}

impl BotConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    /// Loads configuration from an explicit set of variables instead of the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default().source(Some(vars)))
    }

    fn from_environment(env: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(env.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// The channel handle in `@name` form.
    #[must_use]
    pub fn channel_handle(&self) -> String {
        let name = self.channel_username.trim_start_matches('@');
        format!("@{name}")
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("telegram_bot_token", &"<redacted>")
            .field("channel_username", &self.channel_username)
            .field("bot_language", &self.bot_language)
            .field("locales_dir", &self.locales_dir)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_timeout_seconds", &self.poll_timeout_seconds)
            .finish()
    }
}
