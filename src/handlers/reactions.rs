//! Pattern-triggered reactions.

use async_trait::async_trait;
use tracing::warn;

use crate::dispatch::cleanup::EPHEMERAL_DELAY;
use crate::dispatch::event::InboundEvent;
use crate::dispatch::{EventHandler, HandlerContext};
use crate::telegram::SendOptions;
use crate::texts;

/// ".ru" link warning. Stays in the chat.
pub struct DotRu;

#[async_trait]
impl EventHandler for DotRu {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        ctx.api
            .send_text(
                event.chat_id,
                texts::RU_PROPAGANDA,
                SendOptions::reply_to(event.message_id),
            )
            .await?;
        Ok(())
    }
}

/// Tesla mention counter with a live quote when the market API answers.
pub struct Tesla;

#[async_trait]
impl EventHandler for Tesla {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let text = match ctx.services.ticker.price("TSLA").await {
            Ok(price) => texts::TESLA_AGAIN.replace("{price}", &format!("{price:.2}")),
            Err(err) => {
                warn!("Ticker lookup failed: {:#}", err);
                texts::TESLA_NO_PRICE.to_string()
            }
        };

        ctx.api
            .send_text(event.chat_id, &text, SendOptions::reply_to(event.message_id))
            .await?;
        Ok(())
    }
}

/// Samsung photo reaction.
pub struct Samsung;

#[async_trait]
impl EventHandler for Samsung {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let sent = ctx
            .api
            .send_photo(
                event.chat_id,
                texts::SAMSUNG_PHOTO_URL,
                SendOptions::reply_to(event.message_id),
            )
            .await?;
        ctx.cleanup.schedule(event.chat_id, vec![sent], EPHEMERAL_DELAY);
        Ok(())
    }
}

/// Video reaction to a certain propagandist.
pub struct Cockman;

#[async_trait]
impl EventHandler for Cockman {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let sent = ctx
            .api
            .send_video(event.chat_id, texts::COCKMAN_VIDEO_URL, SendOptions::default())
            .await?;
        ctx.cleanup.schedule(event.chat_id, vec![sent], EPHEMERAL_DELAY);
        Ok(())
    }
}

/// Answers messages written with Russian-only letters, when the chat has
/// the patrol enabled.
pub struct LanguagePatrol;

#[async_trait]
impl EventHandler for LanguagePatrol {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        if event.is_forward {
            return Ok(());
        }

        let settings = ctx.storage.settings.get_or_create(event.chat_id.0).await?;
        if !settings.language_watch {
            return Ok(());
        }

        ctx.send_ephemeral(
            event.chat_id,
            texts::PALANYTSIA,
            SendOptions::reply_to(event.message_id),
            EPHEMERAL_DELAY,
            &[],
        )
        .await?;
        Ok(())
    }
}
