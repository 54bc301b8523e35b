//! Ticket commands through the full dispatch path.

mod common;

use teloxide::types::{ChatId, MessageId};

use common::test_bot;
use rudecat::dispatch::event::{EventUser, InboundEvent};
use rudecat::texts;

const CHAT: ChatId = ChatId(-100);
const ADMIN: u64 = 1;
const PLEB: u64 = 2;

fn command(message_id: i32, user_id: u64, text: &str) -> InboundEvent {
    InboundEvent::message(CHAT, MessageId(message_id), EventUser::new(user_id, "user"), text)
}

#[tokio::test(start_paused = true)]
async fn test_add_list_remove_round_trip() {
    let bot = test_bot();
    bot.api.grant_admin(ADMIN);

    bot.engine.handle(command(1, ADMIN, "/addticket fix bug")).await;
    assert!(bot.api.last_sent().text.contains("fix bug"));

    bot.engine.handle(command(2, ADMIN, "/tickets")).await;
    let listing = bot.api.last_sent();
    assert!(listing.text.contains(texts::TICKETS_HEADER));
    assert!(listing.text.contains("fix bug"));

    let ticket_id = bot.storage.tickets.list(CHAT.0).await.unwrap()[0].ticket_id;
    bot.engine
        .handle(command(3, ADMIN, &format!("/removeticket {ticket_id}")))
        .await;
    assert!(bot.api.last_sent().text.contains("видалено"));

    bot.engine.handle(command(4, ADMIN, "/tickets")).await;
    assert_eq!(bot.api.last_sent().text, texts::NO_TICKETS);
}

#[tokio::test(start_paused = true)]
async fn test_list_preserves_insertion_order() {
    let bot = test_bot();
    bot.api.grant_admin(ADMIN);

    bot.engine.handle(command(1, ADMIN, "/addticket first")).await;
    bot.engine.handle(command(2, ADMIN, "/addticket second")).await;

    bot.engine.handle(command(3, ADMIN, "/tickets")).await;
    let listing = bot.api.last_sent().text;
    let first = listing.find("first").unwrap();
    let second = listing.find("second").unwrap();
    assert!(first < second);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_id_and_garbage_input() {
    let bot = test_bot();
    bot.api.grant_admin(ADMIN);

    bot.engine.handle(command(1, ADMIN, "/removeticket 42")).await;
    assert_eq!(bot.api.last_sent().text, texts::HACKER_IN_THE_CHAT);

    bot.engine.handle(command(2, ADMIN, "/removeticket abc")).await;
    assert_eq!(bot.api.last_sent().text, texts::ARE_YOU_THINK_IM_THAT_DUMB);

    bot.engine.handle(command(3, ADMIN, "/removeticket")).await;
    assert_eq!(bot.api.last_sent().text, texts::WHERE_IS_TICKET_NUMBER);

    bot.engine.handle(command(4, ADMIN, "/addticket")).await;
    assert_eq!(bot.api.last_sent().text, texts::NEED_TO_DEFINE_TICKET);
}

#[tokio::test(start_paused = true)]
async fn test_non_admin_is_denied() {
    let bot = test_bot();
    bot.api.grant_admin(ADMIN);

    bot.engine.handle(command(1, PLEB, "/addticket sneaky")).await;
    assert_eq!(bot.api.last_sent().text, texts::ONLY_ADMINS_ARE_ALLOWED);
    assert!(bot.storage.tickets.list(CHAT.0).await.unwrap().is_empty());

    bot.engine.handle(command(2, PLEB, "/tickets")).await;
    assert_eq!(bot.api.last_sent().text, texts::ONLY_ADMINS_ARE_ALLOWED);
}
