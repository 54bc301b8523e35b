//! Free-text questions to the completion backend.

use async_trait::async_trait;
use tracing::warn;

use crate::dispatch::event::InboundEvent;
use crate::dispatch::{EventHandler, HandlerContext};
use crate::telegram::SendOptions;
use crate::texts;

/// "кіт <питання>": forwards the question, answers with whatever comes
/// back. Any backend trouble, a missing credential included, turns into
/// the fixed apology line.
pub struct Ask;

#[async_trait]
impl EventHandler for Ask {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let text = event.text.as_deref().unwrap_or_default();
        let prompt = text
            .strip_prefix("кіт ")
            .or_else(|| text.strip_prefix("Кіт "))
            .unwrap_or(text)
            .trim();

        let reply = if prompt.is_empty() {
            texts::EMPTY_PROMPT.to_string()
        } else {
            match ctx.services.completions.complete(prompt).await {
                Ok(answer) => answer,
                Err(err) => {
                    warn!("Completion failed: {:#}", err);
                    texts::OOPS_I_DIDNT_AGAIN.to_string()
                }
            }
        };

        ctx.api
            .send_text(event.chat_id, &reply, SendOptions::reply_to(event.message_id))
            .await?;

        Ok(())
    }
}
