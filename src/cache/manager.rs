//! In-memory TTL cache keyed by normalized registration number
//!
//! Provides a `TtlCache` that stores values with their insertion timestamp and
//! drops them lazily the first time they are read after expiry.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Wrapper struct for a cached value
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    /// The cached value
    data: T,
    /// When the value was cached
    cached_at: DateTime<Utc>,
}

/// Thread-safe key/value store with a fixed time-to-live
///
/// All access goes through a single coarse lock; entries are small and reads are
/// cheap compared to the upstream fetch they save. There is no background
/// eviction: an entry is removed when a read finds it expired, or replaced when
/// the same key is written again. Keys that are never read again stay until
/// restart, so the map grows with the number of distinct keys looked up.
#[derive(Debug)]
pub struct TtlCache<T> {
    /// Live entries by key
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    /// How long an entry stays fresh
    ttl: TimeDelta,
}

impl<T: Clone> TtlCache<T> {
    /// Creates an empty cache whose entries stay fresh for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Returns the configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl.to_std().unwrap_or(Duration::MAX)
    }

    /// Reads a fresh value from the cache
    ///
    /// # Returns
    /// * `Some(T)` if the key exists and was written less than `ttl` ago
    /// * `None` if the key is missing, or expired (the entry is removed)
    pub fn get(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// Writes a value, replacing any existing entry and resetting its age
    pub fn put(&self, key: &str, data: T) {
        self.put_at(key, data, Utc::now());
    }

    /// Number of entries currently held, expired ones included
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let mut entries = self.lock();
        let entry = entries.get(key)?;

        if now - entry.cached_at < self.ttl {
            debug!(key, "cache hit");
            return Some(entry.data.clone());
        }

        debug!(key, cached_at = %entry.cached_at, "cache entry expired");
        entries.remove(key);
        None
    }

    fn put_at(&self, key: &str, data: T, now: DateTime<Utc>) {
        let entry = CacheEntry {
            data,
            cached_at: now,
        };
        self.lock().insert(key.to_string(), entry);
    }

    /// The map is never left half-updated, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn test_data(name: &str, value: i32) -> TestData {
        TestData {
            name: name.to_string(),
            value,
        }
    }

    fn create_test_cache() -> TtlCache<TestData> {
        TtlCache::new(Duration::from_secs(600))
    }

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let cache = create_test_cache();

        assert!(cache.get("nonexistent_key").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_then_get_returns_value() {
        let cache = create_test_cache();
        let data = test_data("fresh", 100);

        cache.put("MH12AB1234", data.clone());

        assert_eq!(cache.get("MH12AB1234"), Some(data));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entry_is_fresh_just_before_ttl() {
        let cache = create_test_cache();
        let t0 = Utc::now();
        cache.put_at("KA01", test_data("a", 1), t0);

        let just_before = t0 + TimeDelta::seconds(599);
        assert_eq!(cache.get_at("KA01", just_before), Some(test_data("a", 1)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entry_expires_at_ttl_and_is_removed() {
        let cache = create_test_cache();
        let t0 = Utc::now();
        cache.put_at("KA01", test_data("a", 1), t0);

        let at_ttl = t0 + TimeDelta::seconds(600);
        assert!(cache.get_at("KA01", at_ttl).is_none());
        assert!(cache.is_empty(), "Expired entry should be evicted on read");
        assert!(cache.lock().get("KA01").is_none());
    }

    #[test]
    fn test_expired_read_leaves_other_keys() {
        let cache = create_test_cache();
        let t0 = Utc::now();
        cache.put_at("OLD", test_data("old", 1), t0);
        cache.put_at("NEW", test_data("new", 2), t0 + TimeDelta::seconds(500));

        let later = t0 + TimeDelta::seconds(700);
        assert!(cache.get_at("OLD", later).is_none());
        assert_eq!(cache.get_at("NEW", later), Some(test_data("new", 2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_resets_timestamp() {
        let cache = create_test_cache();
        let t0 = Utc::now();
        cache.put_at("KA01", test_data("first", 1), t0);
        cache.put_at("KA01", test_data("second", 2), t0 + TimeDelta::seconds(550));

        let later = t0 + TimeDelta::seconds(700);
        assert_eq!(cache.get_at("KA01", later), Some(test_data("second", 2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unread_expired_entries_are_retained() {
        let cache = create_test_cache();
        let t0 = Utc::now() - TimeDelta::seconds(3600);
        cache.put_at("KA01", test_data("a", 1), t0);
        cache.put_at("KA02", test_data("b", 2), t0);

        cache.put("KA03", test_data("c", 3));
        assert_eq!(cache.len(), 3, "Expired entries stay until read or overwritten");

        assert!(cache.get("KA01").is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_ttl_never_serves() {
        let cache: TtlCache<TestData> = TtlCache::new(Duration::ZERO);
        cache.put("KA01", test_data("a", 1));

        assert!(cache.get("KA01").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_ttl_accessor_reports_configured_value() {
        let cache: TtlCache<TestData> = TtlCache::new(Duration::from_secs(42));
        assert_eq!(cache.ttl(), Duration::from_secs(42));
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let cache = Arc::new(create_test_cache());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for j in 0..50 {
                        let key = format!("K{}", j % 10);
                        cache.put(&key, test_data("t", i));
                        let _ = cache.get(&key);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("writer thread panicked");
        }

        assert_eq!(cache.len(), 10);
    }
}
