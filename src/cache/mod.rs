//! Time-bounded in-memory cache keyed by source URL.
//!
//! Entries live until they expire or the cache is cleared. There is no size
//! bound and no eviction policy beyond expiry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    payload: T,
    expires_at: Instant,
}

/// A TTL cache shared across requests.
///
/// Every mutation goes through [`get`](TtlCache::get), [`put`](TtlCache::put)
/// or [`clear`](TtlCache::clear). Lookups past the expiry instant are misses
/// and drop the stale entry.
#[derive(Debug)]
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> TtlCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.get_at(key, Instant::now())
    }

    /// Look up `key` as observed at `now`.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<T> {
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.payload.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: &str, payload: T, ttl_secs: u64) {
        self.put_at(key, payload, ttl_secs, Instant::now());
    }

    /// Store `payload` so that it expires `ttl_secs` after `now`.
    pub fn put_at(&self, key: &str, payload: T, ttl_secs: u64, now: Instant) {
        let Some(expires_at) = now.checked_add(Duration::from_secs(ttl_secs)) else {
            tracing::warn!("TTL of {}s overflows the clock, not caching {}", ttl_secs, key);
            return;
        };

        self.lock().insert(
            key.to_string(),
            CacheEntry {
                payload,
                expires_at,
            },
        );
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including ones that expired but have not
    /// been looked up since.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get_before_expiry() {
        let cache = TtlCache::new();
        let now = Instant::now();
        cache.put_at("https://example.com/feed", vec![1, 2, 3], 60, now);

        let hit = cache.get_at("https://example.com/feed", now + Duration::from_secs(59));
        assert_eq!(hit, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_get_after_expiry_is_miss() {
        let cache = TtlCache::new();
        let now = Instant::now();
        cache.put_at("key", "value".to_string(), 60, now);

        assert_eq!(cache.get_at("key", now + Duration::from_secs(60)), None);
        assert_eq!(cache.get_at("key", now + Duration::from_secs(61)), None);
    }

    #[test]
    fn test_expired_lookup_removes_entry() {
        let cache = TtlCache::new();
        let now = Instant::now();
        cache.put_at("key", 1u32, 10, now);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.get_at("key", now + Duration::from_secs(11)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_is_never_served() {
        let cache = TtlCache::new();
        cache.put("key", 1u32, 0);
        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn test_missing_key() {
        let cache: TtlCache<u32> = TtlCache::new();
        assert_eq!(cache.get("absent"), None);
    }

    #[test]
    fn test_put_overwrites() {
        let cache = TtlCache::new();
        cache.put("key", 1u32, 60);
        cache.put("key", 2u32, 60);
        assert_eq!(cache.get("key"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_removes_everything() {
        let cache = TtlCache::new();
        cache.put("a", 1u32, 60);
        cache.put("b", 2u32, 60);

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_overflowing_ttl_is_not_stored() {
        let cache = TtlCache::new();
        cache.put("key", 1u32, u64::MAX);
        assert!(cache.is_empty());
    }
}
