//! The render gate collapses a burst of "топ" requests into one render.

mod common;

use teloxide::types::{ChatId, MessageId};
use tokio::time::{advance, Duration};

use common::{test_bot, SentKind};
use rudecat::dispatch::event::{EventUser, InboundEvent};
use rudecat::texts;

fn top_event(message_id: i32, user_id: u64) -> InboundEvent {
    InboundEvent::message(
        ChatId(-100),
        MessageId(message_id),
        EventUser::new(user_id, "someone"),
        "топ",
    )
}

fn render_count(bot: &common::TestBot) -> usize {
    bot.api
        .sent_messages()
        .iter()
        .filter(|m| m.kind == SentKind::Text && m.text.contains(texts::ACCOUNTS_IN_CHAT))
        .count()
}

#[tokio::test(start_paused = true)]
async fn test_burst_yields_one_render_and_suppressed_rest() {
    let bot = test_bot();

    bot.engine.handle(top_event(1, 1)).await;
    bot.engine.handle(top_event(2, 2)).await;
    bot.engine.handle(top_event(3, 3)).await;

    assert_eq!(render_count(&bot), 1);

    // Suppressed requests still clean their trigger away.
    let deleted = bot.api.deleted_messages();
    assert!(deleted.contains(&(-100, 2)));
    assert!(deleted.contains(&(-100, 3)));
}

#[tokio::test(start_paused = true)]
async fn test_spaced_requests_each_render() {
    let bot = test_bot();

    bot.engine.handle(top_event(1, 1)).await;
    // Past the on-screen window the permit is dropped and the gate is free.
    advance(Duration::from_secs(31)).await;
    tokio::task::yield_now().await;
    bot.engine.handle(top_event(2, 2)).await;

    assert_eq!(render_count(&bot), 2);
}

#[tokio::test(start_paused = true)]
async fn test_render_reflects_chat_stats() {
    let bot = test_bot();

    // Three tracked messages from one user, then the request.
    for message_id in 10..13 {
        bot.engine
            .handle(InboundEvent::message(
                ChatId(-100),
                MessageId(message_id),
                EventUser::new(5, "chatty"),
                "просто повідомлення",
            ))
            .await;
    }
    // The request itself comes from another member so the stored display
    // name of user 5 stays untouched.
    bot.engine.handle(top_event(20, 9)).await;

    let render = bot
        .api
        .sent_messages()
        .into_iter()
        .find(|m| m.text.contains(texts::ACCOUNTS_IN_CHAT))
        .expect("no render sent");
    assert!(render.text.contains("chatty"));
    assert!(render.text.contains(texts::TOP_CHAT_ACTIVE));
}
