//! Scheduled deletion of ephemeral messages.
//!
//! Handlers hand the scheduler a set of message ids and a delay; after the
//! delay the messages are deleted best-effort. Tasks can be cancelled by id
//! before they fire, which the onboarding flow uses when a member confirms
//! early. Deletion failures are routine (a moderator may have removed the
//! message first) and are only ever logged at debug level.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use teloxide::types::{ChatId, MessageId};
use tokio::task::AbortHandle;
use tracing::debug;

use crate::telegram::ChatApi;

/// Delay for ordinary ephemeral confirmations.
pub const EPHEMERAL_DELAY: Duration = Duration::from_secs(30);
/// Delay for the /start info card.
pub const START_DELAY: Duration = Duration::from_secs(60);
/// Delay before an unanswered welcome challenge expires.
pub const ONBOARDING_DELAY: Duration = Duration::from_secs(90);

/// Fire-and-forget deletion scheduler.
#[derive(Clone)]
pub struct CleanupScheduler {
    api: Arc<dyn ChatApi>,
    tasks: Arc<DashMap<u64, AbortHandle>>,
    next_id: Arc<AtomicU64>,
}

impl CleanupScheduler {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self {
            api,
            tasks: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Schedule `messages` in `chat_id` for deletion after `delay`.
    ///
    /// Returns a task id accepted by [`cancel`](Self::cancel). The task
    /// unregisters itself once it has fired, so ids are single-use.
    pub fn schedule(&self, chat_id: ChatId, messages: Vec<MessageId>, delay: Duration) -> u64 {
        let task_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let api = Arc::clone(&self.api);
        let tasks = Arc::clone(&self.tasks);
        // The deadline is anchored here, not at the task's first poll.
        let deadline = tokio::time::Instant::now() + delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            for message_id in messages {
                if let Err(err) = api.delete_message(chat_id, message_id).await {
                    debug!(
                        "Cleanup delete of message {} in chat {} failed: {}",
                        message_id.0, chat_id, err
                    );
                }
            }
            tasks.remove(&task_id);
        });

        self.tasks.insert(task_id, handle.abort_handle());
        task_id
    }

    /// Cancel a pending task. Returns false when the task already fired or
    /// was cancelled before; cancelling twice is harmless.
    pub fn cancel(&self, task_id: u64) -> bool {
        match self.tasks.remove(&task_id) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Number of tasks still waiting to fire.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::Result;
    use async_trait::async_trait;
    use teloxide::types::UserId;
    use tokio::time::{advance, Duration};

    use super::*;
    use crate::telegram::{MemberRole, SendOptions};

    /// Records deletions; fails them when `fail` is set.
    #[derive(Default)]
    struct DeleteLog {
        deleted: Mutex<Vec<(i64, i32)>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatApi for DeleteLog {
        async fn send_text(&self, _: ChatId, _: &str, _: SendOptions) -> Result<MessageId> {
            Ok(MessageId(0))
        }
        async fn send_photo(&self, _: ChatId, _: &str, _: SendOptions) -> Result<MessageId> {
            Ok(MessageId(0))
        }
        async fn send_video(&self, _: ChatId, _: &str, _: SendOptions) -> Result<MessageId> {
            Ok(MessageId(0))
        }
        async fn send_animation(
            &self,
            _: ChatId,
            _: &str,
            _: &str,
            _: SendOptions,
        ) -> Result<MessageId> {
            Ok(MessageId(0))
        }
        async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
            if self.fail {
                anyhow::bail!("message to delete not found");
            }
            self.deleted.lock().unwrap().push((chat_id.0, message_id.0));
            Ok(())
        }
        async fn answer_callback(&self, _: &str, _: &str, _: bool) -> Result<()> {
            Ok(())
        }
        async fn member_role(&self, _: ChatId, _: UserId) -> Result<MemberRole> {
            Ok(MemberRole::Member)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deletes_after_deadline() {
        let log = Arc::new(DeleteLog::default());
        let scheduler = CleanupScheduler::new(log.clone());

        scheduler.schedule(ChatId(-1), vec![MessageId(5), MessageId(6)], EPHEMERAL_DELAY);
        advance(Duration::from_secs(29)).await;
        assert!(log.deleted.lock().unwrap().is_empty());

        advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(
            *log.deleted.lock().unwrap(),
            vec![(-1, 5), (-1, 6)],
        );
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let log = Arc::new(DeleteLog::default());
        let scheduler = CleanupScheduler::new(log.clone());

        let id = scheduler.schedule(ChatId(-1), vec![MessageId(5)], EPHEMERAL_DELAY);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));

        advance(Duration::from_secs(60)).await;
        tokio::task::yield_now().await;
        assert!(log.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_returns_false() {
        let log = Arc::new(DeleteLog::default());
        let scheduler = CleanupScheduler::new(log.clone());

        let id = scheduler.schedule(ChatId(-1), vec![MessageId(5)], EPHEMERAL_DELAY);
        advance(Duration::from_secs(31)).await;
        tokio::task::yield_now().await;
        assert!(!scheduler.cancel(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_failure_is_swallowed() {
        let log = Arc::new(DeleteLog {
            fail: true,
            ..Default::default()
        });
        let scheduler = CleanupScheduler::new(log);

        scheduler.schedule(ChatId(-1), vec![MessageId(5)], EPHEMERAL_DELAY);
        advance(Duration::from_secs(31)).await;
        tokio::task::yield_now().await;
        assert_eq!(scheduler.pending(), 0);
    }
}
