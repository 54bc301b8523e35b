//! New-member welcome flow.
//!
//! Joining a chat starts a challenge: a welcome message with a promise
//! button whose payload carries the member's id. The challenge is tracked
//! explicitly, keyed by the welcome message id, and ends in one of two
//! terminal states - Confirmed, when the member presses the button, or
//! Expired, when the 90 second window runs out and the message is deleted.
//! Settled challenges are evicted from the tracker, so only pending ones
//! occupy memory.

use async_trait::async_trait;
use dashmap::DashMap;
use teloxide::types::MessageId;

use crate::dispatch::cleanup::ONBOARDING_DELAY;
use crate::dispatch::event::InboundEvent;
use crate::dispatch::{EventHandler, HandlerContext};
use crate::telegram::{Button, SendOptions};
use crate::texts;

/// Lifecycle of one welcome challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    Pending,
    Confirmed,
    Expired,
}

/// One outstanding (or settled) welcome challenge.
#[derive(Debug, Clone)]
pub struct JoinChallenge {
    pub chat_id: i64,
    pub new_member_id: u64,
    /// Cleanup task that deletes the welcome message on expiry.
    pub cleanup_task: u64,
    pub state: ChallengeState,
}

/// Process-local challenge table, keyed by welcome message id.
///
/// Deliberately not persisted: after a restart an unanswered challenge
/// message still self-identifies through its callback payload.
#[derive(Default)]
pub struct JoinTracker {
    challenges: DashMap<i32, JoinChallenge>,
}

impl JoinTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, message_id: MessageId, challenge: JoinChallenge) {
        self.challenges.insert(message_id.0, challenge);
    }

    pub fn get(&self, message_id: MessageId) -> Option<JoinChallenge> {
        self.challenges.get(&message_id.0).map(|c| c.clone())
    }

    /// Pending -> Confirmed. Evicts and returns the settled challenge, or
    /// `None` when there was no pending challenge for this message.
    pub fn confirm(&self, message_id: MessageId) -> Option<JoinChallenge> {
        self.challenges
            .remove_if(&message_id.0, |_, c| c.state == ChallengeState::Pending)
            .map(|(_, mut challenge)| {
                challenge.state = ChallengeState::Confirmed;
                challenge
            })
    }

    /// Pending -> Expired. Evicts the challenge; a no-op when it was
    /// already settled.
    pub fn expire(&self, message_id: MessageId) -> bool {
        self.challenges
            .remove_if(&message_id.0, |_, c| c.state == ChallengeState::Pending)
            .is_some()
    }

    /// Number of challenges still awaiting an answer.
    pub fn tracked(&self) -> usize {
        self.challenges.len()
    }
}

/// Greets each joining member with the challenge message.
pub struct NewMember;

#[async_trait]
impl EventHandler for NewMember {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        for member in event.new_members.iter().filter(|m| !m.is_bot) {
            let caption = texts::WELCOME_CAPTION.replace("{mention}", &member.mention());
            let keyboard = vec![vec![
                Button::url(texts::FORM_LABEL, texts::GOOGLE_FORM_URL),
                Button::callback(texts::PROMISE_LABEL, format!("new_user|{}", member.id.0)),
            ]];

            let sent = ctx
                .api
                .send_animation(
                    event.chat_id,
                    texts::WELCOME_ANIMATION_URL,
                    &caption,
                    SendOptions::default().with_keyboard(keyboard),
                )
                .await?;

            let cleanup_task = ctx
                .cleanup
                .schedule(event.chat_id, vec![sent], ONBOARDING_DELAY);

            ctx.joins.register(
                sent,
                JoinChallenge {
                    chat_id: event.chat_id.0,
                    new_member_id: member.id.0,
                    cleanup_task,
                    state: ChallengeState::Pending,
                },
            );

            // Evict the record when the window closes; the cleanup task
            // above removes the message itself.
            let joins = ctx.joins.clone();
            let deadline = tokio::time::Instant::now() + ONBOARDING_DELAY;
            tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                joins.expire(sent);
            });
        }

        Ok(())
    }
}

/// Handles the promise button.
pub struct Confirm;

#[async_trait]
impl EventHandler for Confirm {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let Some(callback) = &event.callback else {
            return Ok(());
        };
        let Some(from) = &event.from else {
            return Ok(());
        };

        // The tracked record is authoritative; the payload id covers
        // challenges that predate a restart.
        let expected_id = match ctx.joins.get(event.message_id) {
            Some(challenge) => Some(challenge.new_member_id),
            None => event
                .callback_data()
                .and_then(|data| data.strip_prefix("new_user|"))
                .and_then(|id| id.parse::<u64>().ok()),
        };

        let Some(expected_id) = expected_id else {
            return Ok(());
        };

        if from.id.0 != expected_id {
            ctx.api
                .answer_callback(&callback.id, texts::WRONG_USER_ALERT, true)
                .await?;
            return Ok(());
        }

        if let Some(challenge) = ctx.joins.confirm(event.message_id) {
            ctx.cleanup.cancel(challenge.cleanup_task);
        }

        ctx.api
            .answer_callback(&callback.id, texts::WELCOME_CONFIRMED_ALERT, true)
            .await?;
        ctx.delete_now(event.chat_id, event.message_id).await;

        Ok(())
    }
}
