//! Small time-bounded cache.
//!
//! Each entry remembers when it was inserted and how long it may live;
//! expiry is checked on read. Access goes through a mutex so one cache can
//! be shared by several sessions in the same process.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) < self.ttl
    }
}

#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the value if it has not expired.
    ///
    /// Expired entries are evicted on the way out.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(key) {
            if entry.is_fresh(Instant::now()) {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: K, value: V, ttl: Duration) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_is_returned() {
        let cache = TtlCache::new();
        cache.insert("rose".to_string(), 1, Duration::from_secs(60));
        assert_eq!(cache.get(&"rose".to_string()), Some(1));
        assert_eq!(cache.get(&"lily".to_string()), None);
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = TtlCache::new();
        cache.insert("rose".to_string(), 1, Duration::ZERO);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"rose".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_replaces_entry() {
        let cache = TtlCache::new();
        cache.insert("rose", "old", Duration::ZERO);
        cache.insert("rose", "new", Duration::from_secs(60));
        assert_eq!(cache.get(&"rose"), Some("new"));
    }

    #[test]
    fn test_short_ttl_expires_after_sleep() {
        let cache = TtlCache::new();
        cache.insert(1u32, "x", Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get(&1u32), None);
    }
}
