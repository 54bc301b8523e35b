//! User repository with cache-first writes.
//!
//! Upserted on every observed message, so the cache is used to skip writes
//! when nothing about the user changed.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use mongodb::Collection;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::models::TelegramUser;
use crate::database::Database;

use super::UserRepository;

/// MongoDB-backed [`UserRepository`].
pub struct MongoUserRepository {
    collection: Collection<TelegramUser>,
    cache: TypedCache<u64, TelegramUser>,
}

impl MongoUserRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        let users_cache = cache.get_or_create(
            "users_by_id",
            CacheConfig::with_capacity(10_000).ttl(Duration::from_secs(3600)),
        );

        Self {
            collection: db.collection("users"),
            cache: users_cache,
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn upsert(&self, user: &TelegramUser) -> Result<()> {
        // Skip the write when the stored display data is already current.
        if let Some(cached) = self.cache.get(&user.user_id) {
            if cached.user_name == user.user_name && cached.user_mention == user.user_mention {
                return Ok(());
            }
        }

        self.cache.insert(user.user_id, user.clone());

        let filter = doc! { "user_id": user.user_id as i64 };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, user)
            .with_options(options)
            .await?;

        debug!("Upserted user {} ({})", user.user_id, user.user_name);
        Ok(())
    }

    async fn get(&self, user_id: u64) -> Result<Option<TelegramUser>> {
        if let Some(user) = self.cache.get(&user_id) {
            return Ok(Some(user));
        }

        let filter = doc! { "user_id": user_id as i64 };
        let result = self.collection.find_one(filter).await?;

        if let Some(user) = &result {
            self.cache.insert(user_id, user.clone());
        }

        Ok(result)
    }
}
