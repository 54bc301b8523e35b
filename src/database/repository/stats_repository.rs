//! Reputation counters repository.
//!
//! All mutations go through `$inc` updates so concurrent karma changes,
//! message tracking and admin commands never lose increments to a
//! read-modify-write race.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, ReplaceOptions, ReturnDocument};
use mongodb::Collection;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::models::{StatDelta, UserChatStats};
use crate::database::Database;

use super::StatsRepository;

/// Cache key for a stats record.
type PairKey = (u64, i64); // (user_id, chat_id)

/// MongoDB-backed [`StatsRepository`].
pub struct MongoStatsRepository {
    collection: Collection<UserChatStats>,
    cache: TypedCache<PairKey, UserChatStats>,
}

impl MongoStatsRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        let stats_cache = cache.get_or_create(
            "user_chat_stats",
            CacheConfig::with_capacity(10_000).ttl(Duration::from_secs(60)),
        );

        Self {
            collection: db.collection("user_chat_stats"),
            cache: stats_cache,
        }
    }

    fn pair_filter(user_id: u64, chat_id: i64) -> mongodb::bson::Document {
        doc! { "user_id": user_id as i64, "chat_id": chat_id }
    }
}

#[async_trait]
impl StatsRepository for MongoStatsRepository {
    async fn get_or_create(&self, user_id: u64, chat_id: i64) -> Result<UserChatStats> {
        if let Some(stats) = self.cache.get(&(user_id, chat_id)) {
            return Ok(stats);
        }

        // Create-or-get in one atomic operation so two first touches of the
        // same pair cannot race into duplicate records.
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let stats = self
            .collection
            .find_one_and_update(
                Self::pair_filter(user_id, chat_id),
                doc! { "$setOnInsert": {
                    "karma": 0_i64,
                    "total_messages": 0_i64,
                    "total_bad_words": 0_i64,
                    "warns": 0_i64,
                    "rude_coins": 0_i64,
                } },
            )
            .with_options(options)
            .await?
            .context("stats upsert returned no document")?;

        self.cache.insert((user_id, chat_id), stats.clone());
        Ok(stats)
    }

    async fn apply(&self, user_id: u64, chat_id: i64, delta: StatDelta) -> Result<UserChatStats> {
        if delta.is_empty() {
            return self.get_or_create(user_id, chat_id).await;
        }

        let mut filter = Self::pair_filter(user_id, chat_id);
        let mut inc = doc! {};
        if delta.karma != 0 {
            inc.insert("karma", delta.karma);
        }
        if delta.messages != 0 {
            inc.insert("total_messages", delta.messages);
        }
        if delta.bad_words != 0 {
            inc.insert("total_bad_words", delta.bad_words);
        }
        if delta.warns != 0 {
            inc.insert("warns", delta.warns);
        }
        if delta.rude_coins != 0 {
            inc.insert("rude_coins", delta.rude_coins);
        }

        // A lowering warns delta must find a counter big enough to take it,
        // otherwise the whole delta is dropped. No upsert in that case: an
        // absent record counts as zero warns.
        let lowering_warns = delta.warns < 0;
        if lowering_warns {
            filter.insert("warns", doc! { "$gte": -delta.warns });
        }

        let options = FindOneAndUpdateOptions::builder()
            .upsert(!lowering_warns)
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection
            .find_one_and_update(filter, doc! { "$inc": inc })
            .with_options(options)
            .await?;

        let stats = match updated {
            Some(stats) => stats,
            None => {
                debug!(
                    "Dropped lowering delta for user {} in chat {}",
                    user_id, chat_id
                );
                self.get_or_create(user_id, chat_id).await?
            }
        };

        self.cache.insert((user_id, chat_id), stats.clone());
        Ok(stats)
    }

    async fn spend_coins(
        &self,
        user_id: u64,
        chat_id: i64,
        amount: i64,
    ) -> Result<Option<UserChatStats>> {
        // Same shape as the warns floor: the balance requirement rides in
        // the filter, so an underfunded record simply does not match. No
        // upsert: an absent record has no coins to spend.
        let mut filter = Self::pair_filter(user_id, chat_id);
        filter.insert("rude_coins", doc! { "$gte": amount });

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection
            .find_one_and_update(filter, doc! { "$inc": { "rude_coins": -amount } })
            .with_options(options)
            .await?;

        if let Some(stats) = &updated {
            self.cache.insert((user_id, chat_id), stats.clone());
        }
        Ok(updated)
    }

    async fn update(&self, stats: &UserChatStats) -> Result<()> {
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(Self::pair_filter(stats.user_id, stats.chat_id), stats)
            .with_options(options)
            .await?;

        self.cache.insert((stats.user_id, stats.chat_id), stats.clone());
        Ok(())
    }

    async fn list_chat(&self, chat_id: i64) -> Result<Vec<UserChatStats>> {
        let mut cursor = self.collection.find(doc! { "chat_id": chat_id }).await?;
        let mut all = Vec::new();

        while let Some(result) = cursor.next().await {
            all.push(result?);
        }

        Ok(all)
    }
}
