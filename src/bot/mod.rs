//! Transport wiring: teloxide dispatcher, polling and webhook runners.

pub mod dispatcher;
mod webhook;

use teloxide::prelude::*;
use tracing::info;

use crate::config::{BotMode, Config};
use crate::telegram::ThrottledBot;

pub use dispatcher::build_dispatcher;

/// Run the bot in the configured mode until shutdown.
pub async fn run(
    config: &Config,
    mut dispatcher: Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>,
    bot: ThrottledBot,
) {
    match config.bot_mode {
        BotMode::Polling => {
            info!("Starting bot in polling mode...");
            dispatcher.dispatch().await;
        }
        BotMode::Webhook => {
            info!("Starting bot in webhook mode...");
            webhook::start_webhook(config, dispatcher, bot).await;
        }
    }
}
