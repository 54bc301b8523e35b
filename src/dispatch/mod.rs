//! Event dispatch.
//!
//! One [`InboundEvent`] comes in, at most one handler runs. The engine first
//! feeds message events into the activity tracker (user upsert + message and
//! bad-word counters), then resolves the handler through the trigger
//! registry and runs it with a [`HandlerContext`]. Handler errors are logged
//! and swallowed so a single bad update can never stall the bot.

pub mod cleanup;
pub mod event;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use teloxide::types::{ChatId, MessageId};
use tracing::{debug, error, warn};

use crate::database::{StatDelta, Storage, TelegramUser};
use crate::handlers::onboarding::JoinTracker;
use crate::leaderboard::LeaderboardAggregator;
use crate::permissions::RoleChecker;
use crate::services::Services;
use crate::telegram::{ChatApi, SendOptions};
use crate::triggers::TriggerRegistry;
use crate::utils::count_bad_words;

use cleanup::CleanupScheduler;
use event::{EventKind, InboundEvent};

/// A registered reaction to an event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()>;
}

/// Everything a handler may touch.
#[derive(Clone)]
pub struct HandlerContext {
    pub api: Arc<dyn ChatApi>,
    pub storage: Storage,
    pub roles: RoleChecker,
    pub leaderboard: Arc<LeaderboardAggregator>,
    pub joins: Arc<JoinTracker>,
    pub cleanup: CleanupScheduler,
    pub services: Services,
}

impl HandlerContext {
    /// Send a text reply and schedule it (plus any extra messages, usually
    /// the triggering one) for deletion after `delay`.
    pub async fn send_ephemeral(
        &self,
        chat_id: ChatId,
        text: &str,
        opts: SendOptions,
        delay: Duration,
        also_delete: &[MessageId],
    ) -> anyhow::Result<MessageId> {
        let sent = self.api.send_text(chat_id, text, opts).await?;
        let mut doomed = vec![sent];
        doomed.extend_from_slice(also_delete);
        self.cleanup.schedule(chat_id, doomed, delay);
        Ok(sent)
    }

    /// Delete a message right away, best-effort.
    pub async fn delete_now(&self, chat_id: ChatId, message_id: MessageId) {
        if let Err(err) = self.api.delete_message(chat_id, message_id).await {
            debug!(
                "Immediate delete of message {} in chat {} failed: {}",
                message_id.0, chat_id, err
            );
        }
    }
}

/// Resolves events to handlers and runs them.
pub struct DispatchEngine {
    registry: TriggerRegistry,
    ctx: HandlerContext,
}

impl DispatchEngine {
    pub fn new(registry: TriggerRegistry, ctx: HandlerContext) -> Self {
        Self { registry, ctx }
    }

    pub fn context(&self) -> &HandlerContext {
        &self.ctx
    }

    /// Handle one inbound event. Never fails; all errors end here.
    pub async fn handle(&self, event: InboundEvent) {
        if event.kind == EventKind::Message {
            self.track_activity(&event).await;
        }

        let Some(trigger) = self.registry.match_event(&event) else {
            return;
        };

        debug!("Event in chat {} matched trigger '{}'", event.chat_id, trigger.name);

        if let Err(err) = trigger.handler.handle(&self.ctx, &event).await {
            error!("Handler '{}' failed: {:#}", trigger.name, err);
        }
    }

    /// Advance the per-(user, chat) activity counters for a message.
    ///
    /// Failures are logged and do not stop the event from being dispatched;
    /// losing one counter tick is better than eating the message.
    async fn track_activity(&self, event: &InboundEvent) {
        let Some(from) = &event.from else {
            return;
        };
        if from.is_bot {
            return;
        }

        let user = TelegramUser::from_event(from);
        if let Err(err) = self.ctx.storage.users.upsert(&user).await {
            warn!("User upsert for {} failed: {:#}", from.id, err);
        }

        let bad_words = event.text.as_deref().map(count_bad_words).unwrap_or(0);
        let delta = StatDelta::message_with_bad_words(bad_words);

        if let Err(err) = self
            .ctx
            .storage
            .stats
            .apply(from.id.0, event.chat_id.0, delta)
            .await
        {
            warn!(
                "Activity tracking for user {} in chat {} failed: {:#}",
                from.id, event.chat_id, err
            );
        }
    }
}
