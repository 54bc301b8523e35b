//! Permission system for checking user roles.
//!
//! Admin-gated commands go through [`RoleChecker`], which caches
//! `getChatMember` lookups so a burst of commands does not hammer the API.

use std::sync::Arc;
use std::time::Duration;

use teloxide::types::{ChatId, UserId};
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::telegram::{ChatApi, MemberRole};

/// Cache key for role lookups.
type RoleCacheKey = (i64, u64); // (chat_id, user_id)

/// Cached chat-member role checker.
#[derive(Clone)]
pub struct RoleChecker {
    api: Arc<dyn ChatApi>,
    cache: TypedCache<RoleCacheKey, MemberRole>,
}

impl RoleChecker {
    pub fn new(api: Arc<dyn ChatApi>, cache_registry: &CacheRegistry) -> Self {
        let cache = cache_registry.get_or_create(
            "member_roles",
            CacheConfig::with_capacity(10_000)
                .ttl(Duration::from_secs(300))
                .tti(Duration::from_secs(120)),
        );

        Self { api, cache }
    }

    /// Get a user's role in a chat, cached.
    pub async fn member_role(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<MemberRole> {
        let cache_key = (chat_id.0, user_id.0);

        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("Role cache hit for user {} in chat {}", user_id, chat_id);
            return Ok(cached);
        }

        let role = self.api.member_role(chat_id, user_id).await?;
        self.cache.insert(cache_key, role);

        Ok(role)
    }

    /// Check if a user is an admin or the chat owner.
    pub async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<bool> {
        Ok(self.member_role(chat_id, user_id).await?.is_admin())
    }

    /// Invalidate the cached role for a user.
    ///
    /// Call this when admin status might have changed.
    #[allow(dead_code)]
    pub fn invalidate(&self, chat_id: ChatId, user_id: UserId) {
        self.cache.invalidate(&(chat_id.0, user_id.0));
        debug!("Invalidated role cache for user {} in chat {}", user_id, chat_id);
    }
}
