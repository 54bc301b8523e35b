//! /start and /help info card.

use async_trait::async_trait;

use crate::dispatch::cleanup::START_DELAY;
use crate::dispatch::event::InboundEvent;
use crate::dispatch::{EventHandler, HandlerContext};
use crate::telegram::{Button, SendOptions};
use crate::texts;

pub struct Start;

#[async_trait]
impl EventHandler for Start {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let text = texts::INFO_TEXT.replace("{version}", texts::BOT_VERSION);
        let opts = SendOptions::default().with_keyboard(vec![vec![Button::url(
            texts::PAGE_LABEL,
            texts::PROJECT_URL,
        )]]);

        ctx.send_ephemeral(event.chat_id, &text, opts, START_DELAY, &[event.message_id])
            .await?;

        Ok(())
    }
}
