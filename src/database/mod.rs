//! Storage layer.
//!
//! Models, repository traits and their MongoDB / in-memory implementations.
//! [`Storage`] is the bundle handlers receive; which implementation backs it
//! is decided once at startup.

pub mod models;
mod mongo;
pub mod repository;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

pub use models::{ChatSettings, StatDelta, TelegramUser, Ticket, UserChatStats};
pub use mongo::Database;
pub use repository::{
    MemorySettingsRepository, MemoryStatsRepository, MemoryTicketRepository, MemoryUserRepository,
    MongoSettingsRepository, MongoStatsRepository, MongoTicketRepository, MongoUserRepository,
    SettingsRepository, StatsRepository, TicketRepository, UserRepository,
};

use crate::cache::CacheRegistry;
use crate::config::Config;

/// Errors the storage layer can surface at startup.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid MongoDB connection string: {0}")]
    BadUri(#[source] mongodb::error::Error),

    #[error("MongoDB server unreachable: {0}")]
    Unreachable(#[source] mongodb::error::Error),
}

/// The repository set handlers work with.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub stats: Arc<dyn StatsRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    /// Pick a backend from the config: MongoDB when `MONGODB_URI` is set,
    /// in-memory otherwise. The in-memory set loses everything on restart,
    /// which is fine for trying the bot out.
    pub async fn connect(config: &Config, cache: &CacheRegistry) -> Result<Self, StoreError> {
        match &config.mongodb_uri {
            Some(uri) => {
                info!("Connecting to MongoDB...");
                let db = Database::connect(uri, &config.mongodb_database).await?;
                Ok(Self {
                    users: Arc::new(MongoUserRepository::new(&db, cache)),
                    stats: Arc::new(MongoStatsRepository::new(&db, cache)),
                    tickets: Arc::new(MongoTicketRepository::new(&db)),
                    settings: Arc::new(MongoSettingsRepository::new(&db, cache)),
                })
            }
            None => {
                info!("MONGODB_URI not set, using in-memory storage");
                Ok(Self::in_memory())
            }
        }
    }

    /// Fresh in-memory repository set. Also what every test runs against.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            stats: Arc::new(MemoryStatsRepository::new()),
            tickets: Arc::new(MemoryTicketRepository::new()),
            settings: Arc::new(MemorySettingsRepository::new()),
        }
    }
}
