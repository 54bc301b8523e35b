//! Cat pictures with a name vote.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::warn;

use crate::dispatch::cleanup::EPHEMERAL_DELAY;
use crate::dispatch::event::InboundEvent;
use crate::dispatch::{EventHandler, HandlerContext};
use crate::telegram::{Button, SendOptions};
use crate::texts;

/// Sends a random cat with two name suggestions to pick from.
pub struct Cat;

#[async_trait]
impl EventHandler for Cat {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let url = match ctx.services.cats.random_cat_url().await {
            Ok(url) => url,
            Err(err) => {
                warn!("Cat fetch failed: {:#}", err);
                ctx.send_ephemeral(
                    event.chat_id,
                    texts::GONE_AWAY,
                    SendOptions::reply_to(event.message_id),
                    EPHEMERAL_DELAY,
                    &[event.message_id],
                )
                .await?;
                return Ok(());
            }
        };

        let names: Vec<&str> = texts::CAT_NAMES
            .choose_multiple(&mut rand::thread_rng(), 2)
            .copied()
            .collect();

        let keyboard = vec![vec![
            Button::callback(texts::CAT_BUTTON_BOY, format!("print|{}", names[0])),
            Button::callback(texts::CAT_BUTTON_GIRL, format!("print|{}", names[1])),
        ]];

        ctx.api
            .send_photo(
                event.chat_id,
                &url,
                SendOptions::reply_to(event.message_id).with_keyboard(keyboard),
            )
            .await?;

        Ok(())
    }
}

/// Answers the name-pick callback under a cat photo.
pub struct CatName;

#[async_trait]
impl EventHandler for CatName {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let Some(callback) = &event.callback else {
            return Ok(());
        };
        let name = event
            .callback_data()
            .and_then(|data| data.strip_prefix("print|"))
            .unwrap_or_default();

        let text = texts::CAT_NAME_ANSWER.replace("{name}", name);
        ctx.api.answer_callback(&callback.id, &text, false).await?;
        Ok(())
    }
}
