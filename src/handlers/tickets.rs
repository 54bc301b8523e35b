//! Admin ticket commands.

use async_trait::async_trait;

use crate::dispatch::cleanup::EPHEMERAL_DELAY;
use crate::dispatch::event::InboundEvent;
use crate::dispatch::{EventHandler, HandlerContext};
use crate::telegram::SendOptions;
use crate::texts;

use super::{command_tail, require_admin};

/// `/tickets` - list the chat's tickets.
pub struct ListTickets;

#[async_trait]
impl EventHandler for ListTickets {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        if !require_admin(ctx, event).await? {
            return Ok(());
        }

        let tickets = ctx.storage.tickets.list(event.chat_id.0).await?;

        let text = if tickets.is_empty() {
            texts::NO_TICKETS.to_string()
        } else {
            let mut out = format!("{}\n", texts::TICKETS_HEADER);
            for ticket in &tickets {
                out.push_str(&format!(
                    "<code>{}</code>: {}\n",
                    ticket.ticket_id,
                    crate::utils::html_escape(&ticket.description)
                ));
            }
            out
        };

        // The command disappears right away, the list lingers a bit.
        ctx.delete_now(event.chat_id, event.message_id).await;
        ctx.send_ephemeral(event.chat_id, &text, SendOptions::default(), EPHEMERAL_DELAY, &[])
            .await?;

        Ok(())
    }
}

/// `/addticket <text>` - append a ticket.
pub struct AddTicket;

#[async_trait]
impl EventHandler for AddTicket {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        if !require_admin(ctx, event).await? {
            return Ok(());
        }

        let text = event.text.as_deref().unwrap_or_default();
        let description = command_tail(text, "/addticket");

        let reply = if description.is_empty() {
            texts::NEED_TO_DEFINE_TICKET.to_string()
        } else {
            ctx.storage.tickets.add(event.chat_id.0, description).await?;
            texts::TICKET_ADDED.replace("{description}", &crate::utils::html_escape(description))
        };

        ctx.send_ephemeral(
            event.chat_id,
            &reply,
            SendOptions::default(),
            EPHEMERAL_DELAY,
            &[event.message_id],
        )
        .await?;

        Ok(())
    }
}

/// `/removeticket <id>` - delete a ticket by id.
pub struct RemoveTicket;

#[async_trait]
impl EventHandler for RemoveTicket {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        if !require_admin(ctx, event).await? {
            return Ok(());
        }

        let text = event.text.as_deref().unwrap_or_default();
        let tail = command_tail(text, "/removeticket");

        let reply = if tail.is_empty() {
            texts::WHERE_IS_TICKET_NUMBER.to_string()
        } else {
            match tail.parse::<i64>() {
                Ok(ticket_id) => {
                    if ctx.storage.tickets.remove(event.chat_id.0, ticket_id).await? {
                        texts::TICKET_DELETED.replace("{id}", &ticket_id.to_string())
                    } else {
                        texts::HACKER_IN_THE_CHAT.to_string()
                    }
                }
                Err(_) => texts::ARE_YOU_THINK_IM_THAT_DUMB.to_string(),
            }
        };

        ctx.send_ephemeral(
            event.chat_id,
            &reply,
            SendOptions::default(),
            EPHEMERAL_DELAY,
            &[event.message_id],
        )
        .await?;

        Ok(())
    }
}
