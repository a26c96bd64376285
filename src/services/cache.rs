//! In-process cache with per-entry expiry, used in front of the relational store.
//! Expiry is checked lazily on read; nothing sweeps the map in the background.
//! One instance is created at startup and handed to the store that needs it.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

use crate::models::FinancialDocument;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;

pub type DocumentCache = TtlCache<FinancialDocument>;

#[derive(Clone)]
struct CacheEntry<V> {
    data: V,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct TtlCache<V> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    /// Returns the value if present and not expired. An expired entry is removed.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();

        let expired = match entries.get(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.data.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.into(),
            CacheEntry {
                data: value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub async fn insert(&self, key: impl Into<String>, value: V) {
        self.set(key, value, self.default_ttl).await;
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Drops every entry whose key contains `needle`. Substring match, so invalidating
    /// user 1 also drops user 10's entries.
    pub async fn invalidate_matching(&self, needle: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.contains(needle));
        before - entries.len()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, expired ones included until they are read.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_value_before_expiry() {
        let cache: TtlCache<u32> = TtlCache::default();
        cache.insert("financial_data:1", 7).await;
        assert_eq!(cache.get("financial_data:1").await, Some(7));
        assert_eq!(cache.get("financial_data:2").await, None);
    }

    #[tokio::test]
    async fn expired_entries_are_evicted_on_read() {
        let cache: TtlCache<u32> = TtlCache::default();
        cache.set("k", 1, Duration::ZERO).await;
        assert_eq!(cache.len().await, 1);

        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn short_ttl_expires() {
        let cache: TtlCache<&'static str> = TtlCache::new(Duration::from_millis(20));
        cache.insert("k", "v").await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn invalidate_removes_single_key() {
        let cache: TtlCache<u32> = TtlCache::default();
        cache.insert("a", 1).await;
        cache.insert("b", 2).await;
        cache.invalidate("a").await;
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("b").await, Some(2));
    }

    #[tokio::test]
    async fn invalidate_matching_is_substring_based() {
        let cache: TtlCache<u32> = TtlCache::default();
        cache.insert("financial_data:1", 1).await;
        cache.insert("financial_data:10", 10).await;
        cache.insert("financial_data:2", 2).await;

        let removed = cache.invalidate_matching("1").await;

        assert_eq!(removed, 2);
        assert_eq!(cache.get("financial_data:2").await, Some(2));
        assert_eq!(cache.get("financial_data:10").await, None);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let cache: TtlCache<u32> = TtlCache::default();
        let handle = cache.clone();
        handle.insert("shared", 5).await;
        assert_eq!(cache.get("shared").await, Some(5));
        cache.clear().await;
        assert!(handle.is_empty().await);
    }
}
