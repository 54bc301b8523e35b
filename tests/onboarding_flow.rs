//! Welcome challenge end to end: join, callback, expiry.

mod common;

use teloxide::types::{ChatId, MessageId};
use tokio::time::{advance, Duration};

use common::{test_bot, SentKind};
use rudecat::dispatch::event::{EventUser, InboundEvent};
use rudecat::handlers::onboarding::ChallengeState;
use rudecat::telegram::Button;
use rudecat::texts;

const CHAT: ChatId = ChatId(-100);
const NEWBIE: u64 = 7;

async fn join(bot: &common::TestBot) -> MessageId {
    bot.engine
        .handle(InboundEvent::member_join(
            CHAT,
            MessageId(1),
            vec![EventUser::new(NEWBIE, "newbie")],
        ))
        .await;

    let welcome = bot.api.last_sent();
    assert_eq!(welcome.kind, SentKind::Animation);
    MessageId(welcome.message_id)
}

fn press(welcome: MessageId, user_id: u64) -> InboundEvent {
    InboundEvent::callback(
        CHAT,
        welcome,
        EventUser::new(user_id, "presser"),
        format!("cb-{user_id}"),
        Some(format!("new_user|{NEWBIE}")),
    )
}

#[tokio::test(start_paused = true)]
async fn test_join_sends_one_challenge_with_member_id() {
    let bot = test_bot();
    let welcome = join(&bot).await;

    let sent = bot.api.sent_messages();
    assert_eq!(sent.len(), 1);

    let callback_data: Vec<_> = sent[0]
        .keyboard
        .iter()
        .flatten()
        .filter_map(|b| match b {
            Button::Callback { data, .. } => Some(data.clone()),
            Button::Url { .. } => None,
        })
        .collect();
    assert_eq!(callback_data, vec![format!("new_user|{NEWBIE}")]);

    let challenge = bot.joins.get(welcome).expect("challenge not tracked");
    assert_eq!(challenge.new_member_id, NEWBIE);
    assert_eq!(challenge.state, ChallengeState::Pending);
}

#[tokio::test(start_paused = true)]
async fn test_wrong_user_gets_alert_and_message_stays() {
    let bot = test_bot();
    let welcome = join(&bot).await;

    bot.engine.handle(press(welcome, 8)).await;

    let answers = bot.api.answered.lock().unwrap().clone();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].1, texts::WRONG_USER_ALERT);
    assert!(answers[0].2, "wrong-user answer must be an alert");

    assert!(bot.api.deleted_messages().is_empty());
    assert_eq!(bot.joins.get(welcome).unwrap().state, ChallengeState::Pending);
}

#[tokio::test(start_paused = true)]
async fn test_right_user_confirms_and_challenge_is_removed() {
    let bot = test_bot();
    let welcome = join(&bot).await;

    bot.engine.handle(press(welcome, NEWBIE)).await;

    let answers = bot.api.answered.lock().unwrap().clone();
    assert_eq!(answers[0].1, texts::WELCOME_CONFIRMED_ALERT);

    assert!(bot.api.deleted_messages().contains(&(CHAT.0, welcome.0)));
    assert!(bot.joins.get(welcome).is_none());
    assert_eq!(bot.joins.tracked(), 0);

    // The expiry cleanup was cancelled; nothing more is deleted later.
    let deleted_before = bot.api.deleted_messages().len();
    advance(Duration::from_secs(120)).await;
    tokio::task::yield_now().await;
    assert_eq!(bot.api.deleted_messages().len(), deleted_before);
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_challenge_expires() {
    let bot = test_bot();
    let welcome = join(&bot).await;

    advance(Duration::from_secs(91)).await;
    tokio::task::yield_now().await;

    assert!(bot.api.deleted_messages().contains(&(CHAT.0, welcome.0)));
    assert!(bot.joins.get(welcome).is_none());
    assert_eq!(bot.joins.tracked(), 0);

    // A late press cannot resurrect the challenge; the payload still lets
    // the member settle the stale button.
    bot.engine.handle(press(welcome, NEWBIE)).await;
    assert!(bot.joins.get(welcome).is_none());
    let answers = bot.api.answered.lock().unwrap().clone();
    assert_eq!(answers.last().unwrap().1, texts::WELCOME_CONFIRMED_ALERT);
}

#[tokio::test(start_paused = true)]
async fn test_bot_members_are_not_challenged() {
    let bot = test_bot();

    let mut robot = EventUser::new(55, "robot");
    robot.is_bot = true;
    bot.engine
        .handle(InboundEvent::member_join(CHAT, MessageId(1), vec![robot]))
        .await;

    assert!(bot.api.sent_messages().is_empty());
}
