//! Chat settings repository with on-demand caching.
//!
//! Read on every language-watch hit, so cached with a medium TTL.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use mongodb::Collection;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::models::ChatSettings;
use crate::database::Database;

use super::SettingsRepository;

/// MongoDB-backed [`SettingsRepository`].
pub struct MongoSettingsRepository {
    collection: Collection<ChatSettings>,
    cache: TypedCache<i64, ChatSettings>,
}

impl MongoSettingsRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        let settings_cache = cache.get_or_create(
            "chat_settings",
            CacheConfig::with_capacity(3_000).ttl(Duration::from_secs(300)),
        );

        Self {
            collection: db.collection("chat_settings"),
            cache: settings_cache,
        }
    }
}

#[async_trait]
impl SettingsRepository for MongoSettingsRepository {
    async fn get_or_create(&self, chat_id: i64) -> Result<ChatSettings> {
        if let Some(settings) = self.cache.get(&chat_id) {
            return Ok(settings);
        }

        let filter = doc! { "chat_id": chat_id };
        let settings = match self.collection.find_one(filter).await? {
            Some(settings) => settings,
            // Defaults are not persisted until an admin changes something.
            None => ChatSettings::new(chat_id),
        };

        self.cache.insert(chat_id, settings.clone());
        Ok(settings)
    }

    async fn save(&self, settings: &ChatSettings) -> Result<()> {
        let filter = doc! { "chat_id": settings.chat_id };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, settings)
            .with_options(options)
            .await?;

        self.cache.insert(settings.chat_id, settings.clone());
        debug!("Saved ChatSettings for chat {}", settings.chat_id);

        Ok(())
    }
}
