//! Environment configuration.
//!
//! Everything is read exactly once at startup, the external-service
//! credential included; handlers only ever see injected values.

use std::env;

/// How updates reach the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotMode {
    Polling,
    Webhook,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// When absent the bot runs on in-memory storage.
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,

    /// Credential for the completion backend. When absent the ask trigger
    /// degrades to its apology text instead of failing.
    pub openai_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics when `BOT_TOKEN` is missing, or when webhook mode is selected
    /// without a `WEBHOOK_URL`. Both are unrecoverable wiring mistakes and
    /// this runs before anything else.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let bot_mode = match env::var("BOT_MODE")
            .unwrap_or_else(|_| "polling".to_string())
            .to_lowercase()
            .as_str()
        {
            "webhook" => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = env::var("WEBHOOK_URL").ok();
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            panic!("WEBHOOK_URL must be set when BOT_MODE is webhook");
        }

        let webhook_port = env::var("WEBHOOK_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8443);

        Self {
            bot_token: env::var("BOT_TOKEN").expect("BOT_TOKEN must be set"),
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret: env::var("WEBHOOK_SECRET").ok(),
            mongodb_uri: env::var("MONGODB_URI").ok(),
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "rudecat".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
        }
    }
}
