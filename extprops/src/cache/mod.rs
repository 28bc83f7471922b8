//! Cache strategies shared by the caching resolver and property views.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Storage policy for memoised lookups.
pub trait CacheStrategy<K, V>: Send + Sync {
    /// Store `value` under `key`.
    fn cache(&self, key: K, value: V);

    /// Cached value for `key`, if present and still valid.
    fn get(&self, key: &K) -> Option<V>;

    /// Drop the entry for `key`.
    fn expire(&self, key: &K);

    /// Drop every entry.
    fn expire_all(&self);
}

/// Unbounded concurrent cache with no expiry.
#[derive(Debug)]
pub struct ConcurrentMapCacheStrategy<K: Eq + Hash, V> {
    entries: DashMap<K, V>,
}

impl<K: Eq + Hash, V> ConcurrentMapCacheStrategy<K, V> {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V> Default for ConcurrentMapCacheStrategy<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheStrategy<K, V> for ConcurrentMapCacheStrategy<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn cache(&self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn expire(&self, key: &K) {
        self.entries.remove(key);
    }

    fn expire_all(&self) {
        self.entries.clear();
    }
}

/// Concurrent cache whose entries lapse after a fixed time to live.
///
/// Expired entries are dropped lazily when they are next read.
#[derive(Debug)]
pub struct ExpiringCacheStrategy<K: Eq + Hash, V> {
    entries: DashMap<K, (V, Instant)>,
    ttl: Duration,
}

impl<K: Eq + Hash, V> ExpiringCacheStrategy<K, V> {
    /// An empty cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Configured time to live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<K, V> CacheStrategy<K, V> for ExpiringCacheStrategy<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn cache(&self, key: K, value: V) {
        self.entries.insert(key, (value, Instant::now()));
    }

    fn get(&self, key: &K) -> Option<V> {
        let fresh = self
            .entries
            .get(key)
            .map(|entry| (entry.1.elapsed() < self.ttl).then(|| entry.0.clone()))?;
        if fresh.is_none() {
            self.entries.remove(key);
        }
        fresh
    }

    fn expire(&self, key: &K) {
        self.entries.remove(key);
    }

    fn expire_all(&self) {
        self.entries.clear();
    }
}

/// Strategy that never stores anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCacheStrategy;

impl<K, V> CacheStrategy<K, V> for NoCacheStrategy {
    fn cache(&self, _key: K, _value: V) {}

    fn get(&self, _key: &K) -> Option<V> {
        None
    }

    fn expire(&self, _key: &K) {}

    fn expire_all(&self) {}
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::{CacheStrategy, ConcurrentMapCacheStrategy, ExpiringCacheStrategy, NoCacheStrategy};

    #[test]
    fn concurrent_cache_round_trips_and_expires() {
        let cache = ConcurrentMapCacheStrategy::new();
        cache.cache("a".to_owned(), 1);
        cache.cache("b".to_owned(), 2);
        assert_eq!(cache.get(&"a".to_owned()), Some(1));

        cache.expire(&"a".to_owned());
        assert_eq!(cache.get(&"a".to_owned()), None);
        assert_eq!(cache.len(), 1);

        cache.expire_all();
        assert!(cache.is_empty());
    }

    #[rstest]
    #[case(Duration::from_secs(60), Some(7))]
    #[case(Duration::ZERO, None)]
    fn expiring_cache_honours_ttl(#[case] ttl: Duration, #[case] expected: Option<i32>) {
        let cache = ExpiringCacheStrategy::new(ttl);
        cache.cache("k", 7);
        assert_eq!(cache.get(&"k"), expected);
    }

    #[test]
    fn no_cache_never_returns_values() {
        let cache = NoCacheStrategy;
        CacheStrategy::<&str, i32>::cache(&cache, "k", 1);
        assert_eq!(CacheStrategy::<&str, i32>::get(&cache, &"k"), None);
    }
}
