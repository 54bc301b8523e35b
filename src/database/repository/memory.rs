//! In-memory repository implementations.
//!
//! Selected at startup when no `MONGODB_URI` is configured, and used by the
//! tests. Backed by DashMap so the per-key locking mirrors the atomicity
//! the Mongo implementations get from `$inc`.

use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use crate::database::models::{ChatSettings, StatDelta, TelegramUser, Ticket, UserChatStats};

use super::{SettingsRepository, StatsRepository, TicketRepository, UserRepository};

/// In-memory [`UserRepository`].
#[derive(Default)]
pub struct MemoryUserRepository {
    users: DashMap<u64, TelegramUser>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn upsert(&self, user: &TelegramUser) -> Result<()> {
        self.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn get(&self, user_id: u64) -> Result<Option<TelegramUser>> {
        Ok(self.users.get(&user_id).map(|u| u.clone()))
    }
}

/// In-memory [`StatsRepository`].
///
/// The DashMap entry guard serializes mutations per pair, which is what the
/// lost-update guarantee needs.
#[derive(Default)]
pub struct MemoryStatsRepository {
    entries: DashMap<(u64, i64), UserChatStats>,
}

impl MemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsRepository for MemoryStatsRepository {
    async fn get_or_create(&self, user_id: u64, chat_id: i64) -> Result<UserChatStats> {
        let entry = self
            .entries
            .entry((user_id, chat_id))
            .or_insert_with(|| UserChatStats::new(user_id, chat_id));
        Ok(entry.clone())
    }

    async fn apply(&self, user_id: u64, chat_id: i64, delta: StatDelta) -> Result<UserChatStats> {
        let mut entry = self
            .entries
            .entry((user_id, chat_id))
            .or_insert_with(|| UserChatStats::new(user_id, chat_id));

        let stats = entry.value_mut();

        // Drop the whole delta when it would push warns below zero.
        if delta.warns < 0 && (stats.warns as i64) < -delta.warns {
            return Ok(stats.clone());
        }

        stats.karma += delta.karma;
        stats.total_messages = stats.total_messages.saturating_add_signed(delta.messages);
        stats.total_bad_words = stats.total_bad_words.saturating_add_signed(delta.bad_words);
        stats.warns = (stats.warns as i64 + delta.warns) as u32;
        stats.rude_coins += delta.rude_coins;

        Ok(stats.clone())
    }

    async fn spend_coins(
        &self,
        user_id: u64,
        chat_id: i64,
        amount: i64,
    ) -> Result<Option<UserChatStats>> {
        let Some(mut entry) = self.entries.get_mut(&(user_id, chat_id)) else {
            return Ok(None);
        };

        let stats = entry.value_mut();
        if stats.rude_coins < amount {
            return Ok(None);
        }
        stats.rude_coins -= amount;
        Ok(Some(stats.clone()))
    }

    async fn update(&self, stats: &UserChatStats) -> Result<()> {
        self.entries
            .insert((stats.user_id, stats.chat_id), stats.clone());
        Ok(())
    }

    async fn list_chat(&self, chat_id: i64) -> Result<Vec<UserChatStats>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.key().1 == chat_id)
            .map(|e| e.value().clone())
            .collect())
    }
}

/// In-memory [`TicketRepository`].
pub struct MemoryTicketRepository {
    next_id: AtomicI64,
    tickets: DashMap<i64, Vec<Ticket>>,
}

impl MemoryTicketRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            tickets: DashMap::new(),
        }
    }
}

impl Default for MemoryTicketRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn add(&self, chat_id: i64, description: &str) -> Result<i64> {
        let ticket_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.tickets
            .entry(chat_id)
            .or_default()
            .push(Ticket::new(ticket_id, chat_id, description));
        Ok(ticket_id)
    }

    async fn remove(&self, chat_id: i64, ticket_id: i64) -> Result<bool> {
        let Some(mut chat_tickets) = self.tickets.get_mut(&chat_id) else {
            return Ok(false);
        };

        let before = chat_tickets.len();
        chat_tickets.retain(|t| t.ticket_id != ticket_id);
        Ok(chat_tickets.len() < before)
    }

    async fn list(&self, chat_id: i64) -> Result<Vec<Ticket>> {
        Ok(self
            .tickets
            .get(&chat_id)
            .map(|v| v.clone())
            .unwrap_or_default())
    }
}

/// In-memory [`SettingsRepository`].
#[derive(Default)]
pub struct MemorySettingsRepository {
    settings: DashMap<i64, ChatSettings>,
}

impl MemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsRepository {
    async fn get_or_create(&self, chat_id: i64) -> Result<ChatSettings> {
        let entry = self
            .settings
            .entry(chat_id)
            .or_insert_with(|| ChatSettings::new(chat_id));
        Ok(entry.clone())
    }

    async fn save(&self, settings: &ChatSettings) -> Result<()> {
        self.settings.insert(settings.chat_id, settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stats_created_zero_valued() {
        let repo = MemoryStatsRepository::new();
        let stats = repo.get_or_create(1, -100).await.unwrap();
        assert_eq!(stats, UserChatStats::new(1, -100));
    }

    #[tokio::test]
    async fn test_apply_returns_post_update_record() {
        let repo = MemoryStatsRepository::new();
        let stats = repo.apply(1, -100, StatDelta::karma(1)).await.unwrap();
        assert_eq!(stats.karma, 1);
        let stats = repo.apply(1, -100, StatDelta::karma(-3)).await.unwrap();
        assert_eq!(stats.karma, -2);
    }

    #[tokio::test]
    async fn test_warns_never_go_below_zero() {
        let repo = MemoryStatsRepository::new();
        let stats = repo.apply(1, -100, StatDelta::warns(-1)).await.unwrap();
        assert_eq!(stats.warns, 0);

        repo.apply(1, -100, StatDelta::warns(1)).await.unwrap();
        let stats = repo.apply(1, -100, StatDelta::warns(-1)).await.unwrap();
        assert_eq!(stats.warns, 0);
    }

    #[tokio::test]
    async fn test_dropped_warn_delta_drops_whole_delta() {
        let repo = MemoryStatsRepository::new();
        repo.apply(1, -100, StatDelta::karma(5)).await.unwrap();

        let mixed = StatDelta {
            karma: 1,
            warns: -1,
            ..Default::default()
        };
        let stats = repo.apply(1, -100, mixed).await.unwrap();
        assert_eq!(stats.karma, 5);
        assert_eq!(stats.warns, 0);
    }

    #[tokio::test]
    async fn test_spend_coins_is_conditional() {
        let repo = MemoryStatsRepository::new();
        repo.apply(1, -100, StatDelta::rude_coins(5)).await.unwrap();

        let after = repo.spend_coins(1, -100, 3).await.unwrap().expect("covered");
        assert_eq!(after.rude_coins, 2);

        assert!(repo.spend_coins(1, -100, 3).await.unwrap().is_none());
        assert_eq!(repo.get_or_create(1, -100).await.unwrap().rude_coins, 2);

        // No record means no coins.
        assert!(repo.spend_coins(9, -100, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_chat_filters_by_chat() {
        let repo = MemoryStatsRepository::new();
        repo.apply(1, -100, StatDelta::message()).await.unwrap();
        repo.apply(2, -100, StatDelta::message()).await.unwrap();
        repo.apply(1, -200, StatDelta::message()).await.unwrap();

        assert_eq!(repo.list_chat(-100).await.unwrap().len(), 2);
        assert_eq!(repo.list_chat(-200).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ticket_ids_grow_and_round_trip() {
        let repo = MemoryTicketRepository::new();
        let first = repo.add(-100, "fix the door").await.unwrap();
        let second = repo.add(-100, "buy milk").await.unwrap();
        assert!(second > first);

        let listed = repo.list(-100).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].description, "fix the door");
        assert_eq!(listed[1].description, "buy milk");

        assert!(repo.remove(-100, first).await.unwrap());
        assert!(!repo.remove(-100, first).await.unwrap());
        assert_eq!(repo.list(-100).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ticket_remove_checks_chat() {
        let repo = MemoryTicketRepository::new();
        let id = repo.add(-100, "secret").await.unwrap();
        assert!(!repo.remove(-200, id).await.unwrap());
        assert!(repo.remove(-100, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_settings_default_to_language_watch_on() {
        let repo = MemorySettingsRepository::new();
        let settings = repo.get_or_create(-100).await.unwrap();
        assert!(settings.language_watch);

        let mut settings = settings;
        settings.language_watch = false;
        repo.save(&settings).await.unwrap();
        assert!(!repo.get_or_create(-100).await.unwrap().language_watch);
    }
}
