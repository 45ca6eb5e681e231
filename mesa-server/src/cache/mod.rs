//! In-process TTL cache
//!
//! Fixed-TTL key/value store for the availability and reservations-by-date
//! lookups. Entries live in a [`DashMap`] so handlers on different runtime
//! workers and the sweep task can touch it concurrently. There is no size
//! bound; expired entries are dropped on read and by [`TtlCache::sweep`].

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::utils::SharedClock;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: i64,
}

/// Fixed-TTL cache keyed by `String`
///
/// Cloning is cheap and shares the underlying map.
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    name: &'static str,
    entries: Arc<DashMap<String, Entry<V>>>,
    ttl_ms: i64,
    clock: SharedClock,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(name: &'static str, ttl: Duration, clock: SharedClock) -> Self {
        Self {
            name,
            entries: Arc::new(DashMap::new()),
            ttl_ms: ttl.as_millis() as i64,
            clock,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms as u64)
    }

    fn is_fresh(&self, stored_at: i64, now: i64) -> bool {
        now - stored_at < self.ttl_ms
    }

    /// Value for `key` if it was stored less than one TTL ago
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now_millis();
        if let Some(entry) = self.entries.get(key) {
            if self.is_fresh(entry.stored_at, now) {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }
        // Expired: drop it unless a concurrent `set` refreshed it meanwhile
        self.entries
            .remove_if(key, |_, entry| !self.is_fresh(entry.stored_at, now));
        None
    }

    /// Store `value` under `key`, stamped with the current time
    pub fn set(&self, key: impl Into<String>, value: V) {
        let stored_at = self.clock.now_millis();
        self.entries.insert(key.into(), Entry { value, stored_at });
    }

    /// Drop `key`; returns whether an entry was present
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_millis();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now - entry.stored_at < self.ttl_ms);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(cache = self.name, removed, "Swept expired cache entries");
        }
        removed
    }

    /// Number of stored entries, expired ones included until swept
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Availability cache key for a reservation slot
pub fn slot_key(date: &str, time: &str) -> String {
    format!("{date}|{time}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ManualClock;

    fn cache_with_clock(ttl_secs: u64) -> (TtlCache<bool>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let cache = TtlCache::new("test", Duration::from_secs(ttl_secs), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_hit_before_ttl_miss_after() {
        let (cache, clock) = cache_with_clock(5);
        cache.set(slot_key("2025-06-01", "19:00"), true);

        clock.advance(Duration::from_secs(4));
        assert_eq!(cache.get("2025-06-01|19:00"), Some(true));

        clock.advance(Duration::from_secs(2));
        assert_eq!(cache.get("2025-06-01|19:00"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_entry_expires_exactly_at_ttl() {
        let (cache, clock) = cache_with_clock(5);
        cache.set("k", false);
        clock.advance(Duration::from_millis(4_999));
        assert_eq!(cache.get("k"), Some(false));
        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_set_overwrites_and_restamps() {
        let (cache, clock) = cache_with_clock(5);
        cache.set("k", true);
        clock.advance(Duration::from_secs(4));
        cache.set("k", false);
        clock.advance(Duration::from_secs(4));
        assert_eq!(cache.get("k"), Some(false));
    }

    #[test]
    fn test_delete() {
        let (cache, _clock) = cache_with_clock(5);
        cache.set("k", true);
        assert!(cache.delete("k"));
        assert!(!cache.delete("k"));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (cache, clock) = cache_with_clock(5);
        cache.set("old", true);
        clock.advance(Duration::from_secs(3));
        cache.set("new", true);
        clock.advance(Duration::from_secs(3));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("new"), Some(true));
    }

    #[test]
    fn test_clones_share_entries() {
        let (cache, _clock) = cache_with_clock(5);
        let other = cache.clone();
        cache.set("k", true);
        assert_eq!(other.get("k"), Some(true));
    }
}
