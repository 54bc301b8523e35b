//! Unsolicited advice, the message catch-all.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use teloxide::types::UserId;

use crate::dispatch::event::InboundEvent;
use crate::dispatch::{EventHandler, HandlerContext};
use crate::telegram::SendOptions;
use crate::texts;

/// Drops a random advice line when someone replies to the bot, plus a small
/// random chance on any other message. Everything else stays silent.
pub struct Advices {
    pub bot_user_id: UserId,
}

#[async_trait]
impl EventHandler for Advices {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        if event.text.is_none() {
            return Ok(());
        }

        let replied_to_bot = event
            .reply_to
            .as_ref()
            .and_then(|r| r.from.as_ref())
            .is_some_and(|from| from.id == self.bot_user_id);

        // The rng must not live across the send await.
        let (advice, opts) = {
            let mut rng = rand::thread_rng();
            if !replied_to_bot && rng.gen_range(1..1000) <= 985 {
                return Ok(());
            }

            let Some(advice) = texts::ADVICES.choose(&mut rng).copied() else {
                return Ok(());
            };

            // Half the time the advice is a reply, half the time it just
            // lands in the chat.
            let opts = if rng.gen_bool(0.5) {
                SendOptions::reply_to(event.message_id)
            } else {
                SendOptions::default()
            };
            (advice, opts)
        };

        ctx.api.send_text(event.chat_id, advice, opts).await?;
        Ok(())
    }
}
