//! teloxide dispatcher and update adapters.
//!
//! The only place raw teloxide updates are turned into [`InboundEvent`]s.
//! Everything after that point runs through the dispatch engine and is
//! testable without a live connection.

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message, User};

use crate::dispatch::event::{EventUser, InboundEvent};
use crate::dispatch::DispatchEngine;
use crate::telegram::ThrottledBot;

fn event_user(user: &User) -> EventUser {
    EventUser {
        id: user.id,
        first_name: user.first_name.clone(),
        username: user.username.clone(),
        is_bot: user.is_bot,
    }
}

/// Normalize a message update. Non-text, non-join service messages still
/// become plain message events so activity tracking sees them.
fn message_event(msg: &Message) -> Option<InboundEvent> {
    if let Some(members) = msg.new_chat_members() {
        let members = members.iter().map(event_user).collect();
        return Some(InboundEvent::member_join(msg.chat.id, msg.id, members));
    }

    let from = msg.from.as_ref()?;

    let mut event = InboundEvent::message(msg.chat.id, msg.id, event_user(from), "");
    // A media message without text still counts as activity.
    event.text = msg.text().map(str::to_owned);

    if let Some(reply) = msg.reply_to_message() {
        event = event.with_reply_to(reply.id, reply.from.as_ref().map(event_user));
    }
    if msg.forward_origin().is_some() {
        event = event.forwarded();
    }

    Some(event)
}

/// Normalize a callback query. Queries detached from a reachable message
/// cannot be acted on and are dropped.
fn callback_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let message = query.message.as_ref()?;

    Some(InboundEvent::callback(
        message.chat().id,
        message.id(),
        event_user(&query.from),
        query.id.clone(),
        query.data.clone(),
    ))
}

async fn on_message(msg: Message, engine: Arc<DispatchEngine>) -> anyhow::Result<()> {
    if let Some(event) = message_event(&msg) {
        engine.handle(event).await;
    }
    Ok(())
}

async fn on_callback(query: CallbackQuery, engine: Arc<DispatchEngine>) -> anyhow::Result<()> {
    if let Some(event) = callback_event(&query) {
        engine.handle(event).await;
    }
    Ok(())
}

fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback))
}

/// Build the dispatcher around the engine.
pub fn build_dispatcher(
    bot: ThrottledBot,
    engine: Arc<DispatchEngine>,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![engine])
        .enable_ctrlc_handler()
        .build()
}
