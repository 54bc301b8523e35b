//! Repository module - data access behind storage-agnostic traits.
//!
//! Every store the bot touches is a trait here, with a MongoDB
//! implementation for production and a DashMap one used when no database is
//! configured (and by the tests).

mod memory;
mod settings_repository;
mod stats_repository;
mod ticket_repository;
mod user_repository;

pub use memory::{
    MemorySettingsRepository, MemoryStatsRepository, MemoryTicketRepository, MemoryUserRepository,
};
pub use settings_repository::MongoSettingsRepository;
pub use stats_repository::MongoStatsRepository;
pub use ticket_repository::MongoTicketRepository;
pub use user_repository::MongoUserRepository;

use anyhow::Result;
use async_trait::async_trait;

use super::models::{ChatSettings, StatDelta, TelegramUser, Ticket, UserChatStats};

/// Store of users the bot has seen.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or refresh a user record.
    async fn upsert(&self, user: &TelegramUser) -> Result<()>;

    async fn get(&self, user_id: u64) -> Result<Option<TelegramUser>>;
}

/// Store of per-(user, chat) reputation counters.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Fetch the record for a pair, creating it zero-valued on first access.
    async fn get_or_create(&self, user_id: u64, chat_id: i64) -> Result<UserChatStats>;

    /// Atomically apply field increments and return the post-update record.
    ///
    /// Concurrent calls for the same pair serialize inside the store;
    /// different pairs never contend. A delta that would push `warns` below
    /// zero is dropped whole and the current record is returned unchanged.
    async fn apply(&self, user_id: u64, chat_id: i64, delta: StatDelta) -> Result<UserChatStats>;

    /// Debit `amount` rude-coins when the balance covers it.
    ///
    /// The check and the debit are one atomic operation, so concurrent
    /// spends cannot overdraw. Returns the post-debit record, or `None`
    /// when the balance was short and nothing changed.
    async fn spend_coins(
        &self,
        user_id: u64,
        chat_id: i64,
        amount: i64,
    ) -> Result<Option<UserChatStats>>;

    /// Overwrite a record (admin paths). Upserts by pair.
    async fn update(&self, stats: &UserChatStats) -> Result<()>;

    /// Snapshot of every record in a chat, unordered.
    async fn list_chat(&self, chat_id: i64) -> Result<Vec<UserChatStats>>;
}

/// Append-only ticket log with delete-by-id.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Append a ticket, returning its assigned id.
    async fn add(&self, chat_id: i64, description: &str) -> Result<i64>;

    /// Delete a ticket. Returns false when the id is unknown or belongs to
    /// a different chat.
    async fn remove(&self, chat_id: i64, ticket_id: i64) -> Result<bool>;

    /// All tickets of a chat in insertion order.
    async fn list(&self, chat_id: i64) -> Result<Vec<Ticket>>;
}

/// Store of per-chat toggles.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch chat settings, falling back to defaults when absent.
    async fn get_or_create(&self, chat_id: i64) -> Result<ChatSettings>;

    async fn save(&self, settings: &ChatSettings) -> Result<()>;
}
