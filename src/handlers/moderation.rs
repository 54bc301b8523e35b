//! Warns, scans, coin transfers and the language-watch toggle.

use async_trait::async_trait;

use crate::database::StatDelta;
use crate::dispatch::cleanup::EPHEMERAL_DELAY;
use crate::dispatch::event::{EventUser, InboundEvent};
use crate::dispatch::{EventHandler, HandlerContext};
use crate::telegram::SendOptions;
use crate::texts;

use super::{command_tail, require_admin};

/// Reply target of a reply-gated command, with the usage hint sent when the
/// command was not a reply.
async fn reply_target<'e>(
    ctx: &HandlerContext,
    event: &'e InboundEvent,
) -> anyhow::Result<Option<&'e EventUser>> {
    if let Some(target) = event.reply_to.as_ref().and_then(|r| r.from.as_ref()) {
        return Ok(Some(target));
    }

    ctx.send_ephemeral(
        event.chat_id,
        texts::NEED_REPLY_TARGET,
        SendOptions::reply_to(event.message_id),
        EPHEMERAL_DELAY,
        &[event.message_id],
    )
    .await?;

    Ok(None)
}

/// `/warn` and `/unwarn`: admin-issued warning counter moves.
pub struct AdjustWarns {
    pub delta: i64,
}

#[async_trait]
impl EventHandler for AdjustWarns {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        if !require_admin(ctx, event).await? {
            return Ok(());
        }
        let Some(target) = reply_target(ctx, event).await? else {
            return Ok(());
        };

        // The store refuses a decrement below zero, so /unwarn on a clean
        // user just reports the unchanged count.
        let stats = ctx
            .storage
            .stats
            .apply(target.id.0, event.chat_id.0, StatDelta::warns(self.delta))
            .await?;

        let template = if self.delta > 0 {
            texts::WARN_ADDED
        } else {
            texts::WARN_REMOVED
        };
        let text = template
            .replace("{mention}", &target.mention())
            .replace("{warns}", &stats.warns.to_string());

        ctx.send_ephemeral(
            event.chat_id,
            &text,
            SendOptions::reply_to(event.message_id),
            EPHEMERAL_DELAY,
            &[],
        )
        .await?;

        Ok(())
    }
}

/// `/scan`: show someone else's stats card.
pub struct Scan;

#[async_trait]
impl EventHandler for Scan {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        if !require_admin(ctx, event).await? {
            return Ok(());
        }
        let Some(target) = reply_target(ctx, event).await? else {
            return Ok(());
        };

        let stats = ctx
            .storage
            .stats
            .get_or_create(target.id.0, event.chat_id.0)
            .await?;
        let card = super::karma::stats_card(&target.display_name(), &stats);

        ctx.send_ephemeral(
            event.chat_id,
            &card,
            SendOptions::reply_to(event.message_id),
            EPHEMERAL_DELAY,
            &[event.message_id],
        )
        .await?;

        Ok(())
    }
}

/// `/give N`: transfer rude-coins to the replied-to user.
pub struct GiveCoins;

#[async_trait]
impl EventHandler for GiveCoins {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let Some(from) = event.from.clone() else {
            return Ok(());
        };
        let Some(target) = reply_target(ctx, event).await? else {
            return Ok(());
        };

        if target.id == from.id || target.is_bot {
            return Ok(());
        }

        let text = event.text.as_deref().unwrap_or_default();
        let amount = command_tail(text, "/give").parse::<i64>().ok().filter(|n| *n > 0);

        let Some(amount) = amount else {
            ctx.send_ephemeral(
                event.chat_id,
                texts::GIVE_USAGE,
                SendOptions::reply_to(event.message_id),
                EPHEMERAL_DELAY,
                &[event.message_id],
            )
            .await?;
            return Ok(());
        };

        // The balance check and the debit are one store operation, so
        // concurrent transfers cannot overdraw the sender.
        let debited = ctx
            .storage
            .stats
            .spend_coins(from.id.0, event.chat_id.0, amount)
            .await?;

        if debited.is_none() {
            let balance = ctx
                .storage
                .stats
                .get_or_create(from.id.0, event.chat_id.0)
                .await?
                .rude_coins;
            let text = texts::GIVE_NOT_ENOUGH.replace("{balance}", &balance.to_string());
            ctx.send_ephemeral(
                event.chat_id,
                &text,
                SendOptions::reply_to(event.message_id),
                EPHEMERAL_DELAY,
                &[event.message_id],
            )
            .await?;
            return Ok(());
        }

        let credit = ctx
            .storage
            .stats
            .apply(target.id.0, event.chat_id.0, StatDelta::rude_coins(amount))
            .await;
        if let Err(err) = credit {
            // Put the coins back rather than burn them.
            ctx.storage
                .stats
                .apply(from.id.0, event.chat_id.0, StatDelta::rude_coins(amount))
                .await?;
            return Err(err);
        }

        let text = texts::GIVE_DONE
            .replace("{mention}", &target.mention())
            .replace("{amount}", &amount.to_string())
            .replace("{sender}", &from.mention());

        ctx.send_ephemeral(
            event.chat_id,
            &text,
            SendOptions::reply_to(event.message_id),
            EPHEMERAL_DELAY,
            &[],
        )
        .await?;

        Ok(())
    }
}

/// `/language_watch on|off`: per-chat toggle for the language patrol.
pub struct LanguageWatch;

#[async_trait]
impl EventHandler for LanguageWatch {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        if !require_admin(ctx, event).await? {
            return Ok(());
        }

        let text = event.text.as_deref().unwrap_or_default();
        let reply = match command_tail(text, "/language_watch") {
            "on" => {
                let mut settings = ctx.storage.settings.get_or_create(event.chat_id.0).await?;
                settings.language_watch = true;
                ctx.storage.settings.save(&settings).await?;
                texts::LANGUAGE_WATCH_ON
            }
            "off" => {
                let mut settings = ctx.storage.settings.get_or_create(event.chat_id.0).await?;
                settings.language_watch = false;
                ctx.storage.settings.save(&settings).await?;
                texts::LANGUAGE_WATCH_OFF
            }
            _ => texts::LANGUAGE_WATCH_USAGE,
        };

        ctx.send_ephemeral(
            event.chat_id,
            reply,
            SendOptions::reply_to(event.message_id),
            EPHEMERAL_DELAY,
            &[event.message_id],
        )
        .await?;

        Ok(())
    }
}
