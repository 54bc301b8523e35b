//! Read caches over Moka.
//!
//! Repositories and the role checker create named caches through a shared
//! [`CacheRegistry`], so every cache in the process has a name and one
//! place of construction. Entries are LRU-evicted with optional TTL/TTI.

use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

/// Sizing and expiry for one cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_capacity: u64,
    pub ttl: Option<Duration>,
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)),
            tti: None,
        }
    }
}

impl CacheConfig {
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }
}

/// A typed, clone-cheap handle to one named cache.
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Cache<K, V>>,
}

// Clone by hand so K and V do not need Clone themselves.
impl<K, V> Clone for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn new(config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);
        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }
        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }
        Self {
            inner: Arc::new(builder.build()),
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    pub fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }
}

/// Named cache registry shared across the process.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, Box<dyn Any + Send + Sync>>>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the cache registered under `name`, creating it with `config`
    /// on first use.
    ///
    /// # Panics
    /// Panics when `name` was first created with different key/value types;
    /// that is a wiring bug, not a runtime condition.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        {
            let caches = self.caches.read().unwrap();
            if let Some(existing) = caches.get(name) {
                return existing
                    .downcast_ref::<TypedCache<K, V>>()
                    .unwrap_or_else(|| panic!("cache '{name}' registered with different types"))
                    .clone();
            }
        }

        let mut caches = self.caches.write().unwrap();
        // Double check: another thread may have created it meanwhile.
        if let Some(existing) = caches.get(name) {
            return existing
                .downcast_ref::<TypedCache<K, V>>()
                .unwrap_or_else(|| panic!("cache '{name}' registered with different types"))
                .clone();
        }

        debug!("Creating cache '{}'", name);
        let cache = TypedCache::<K, V>::new(config);
        caches.insert(name.to_string(), Box::new(cache.clone()));
        cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_returns_same_cache() {
        let registry = CacheRegistry::new();
        let a: TypedCache<u64, String> = registry.get_or_create("t", CacheConfig::default());
        a.insert(1, "one".to_string());

        let b: TypedCache<u64, String> = registry.get_or_create("t", CacheConfig::default());
        assert_eq!(b.get(&1).as_deref(), Some("one"));

        b.invalidate(&1);
        assert!(a.get(&1).is_none());
    }

    #[test]
    #[should_panic(expected = "different types")]
    fn test_type_mismatch_panics() {
        let registry = CacheRegistry::new();
        let _a: TypedCache<u64, String> = registry.get_or_create("t", CacheConfig::default());
        let _b: TypedCache<i64, String> = registry.get_or_create("t", CacheConfig::default());
    }
}
