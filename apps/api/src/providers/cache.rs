//! TTL cache for fetched platform metrics.
//!
//! Keys are `"<source>:<lowercased identifier>"`. Entries expire on read and
//! the oldest entry is evicted once the cache is full.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::analysis::sources::SourceId;

pub const DEFAULT_MAX_ENTRIES: usize = 1024;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
}

pub struct SourceCache<T> {
    source: SourceId,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
    max_entries: usize,
}

impl<T: Clone> SourceCache<T> {
    pub fn new(source: SourceId, ttl: Duration, max_entries: usize) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn key(&self, identifier: &str) -> String {
        format!("{}:{}", self.source.as_str(), identifier.trim().to_lowercase())
    }

    /// Returns a fresh entry. A stale one is removed and reported as a miss.
    pub fn get(&self, identifier: &str) -> Option<T> {
        let key = self.key(identifier);
        let mut entries = self.lock();

        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                debug!(%key, "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!(%key, "cache entry expired");
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, identifier: &str, value: T) {
        let key = self.key(identifier);
        let mut entries = self.lock();

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            evict_oldest(&mut entries);
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        before - entries.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned map still holds valid entries.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn evict_oldest<T>(entries: &mut HashMap<String, CacheEntry<T>>) {
    if let Some(oldest) = entries
        .iter()
        .min_by_key(|(_, entry)| entry.inserted_at)
        .map(|(key, _)| key.clone())
    {
        entries.remove(&oldest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = SourceCache::new(SourceId::Github, Duration::from_secs(60), 10);
        cache.insert("octo", 42u64);
        assert_eq!(cache.get("octo"), Some(42));
        assert_eq!(cache.get("someone-else"), None);
    }

    #[test]
    fn test_key_is_case_insensitive_and_namespaced() {
        let cache = SourceCache::new(SourceId::Leetcode, Duration::from_secs(60), 10);
        assert_eq!(cache.key("  Alice "), "leetcode:alice");
        cache.insert("Alice", 7u64);
        assert_eq!(cache.get("ALICE"), Some(7));
    }

    #[test]
    fn test_expired_entry_is_a_miss_and_removed() {
        let cache = SourceCache::new(SourceId::Hackerrank, Duration::from_millis(50), 10);
        cache.insert("dev", 1u64);
        assert_eq!(cache.get("dev"), Some(1));

        std::thread::sleep(Duration::from_millis(80));

        assert_eq!(cache.get("dev"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_oldest_entry_evicted_when_full() {
        let cache = SourceCache::new(SourceId::Github, Duration::from_secs(60), 2);
        cache.insert("first", 1u64);
        std::thread::sleep(Duration::from_millis(5));
        cache.insert("second", 2u64);
        std::thread::sleep(Duration::from_millis(5));
        cache.insert("third", 3u64);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("first"), None);
        assert_eq!(cache.get("second"), Some(2));
        assert_eq!(cache.get("third"), Some(3));
    }

    #[test]
    fn test_reinsert_does_not_evict() {
        let cache = SourceCache::new(SourceId::Github, Duration::from_secs(60), 2);
        cache.insert("a", 1u64);
        cache.insert("b", 2u64);
        cache.insert("a", 10u64);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_purge_expired() {
        let cache = SourceCache::new(SourceId::Github, Duration::from_millis(30), 10);
        cache.insert("a", 1u64);
        cache.insert("b", 2u64);
        std::thread::sleep(Duration::from_millis(60));
        cache.insert("c", 3u64);

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("c"), Some(3));
    }
}
