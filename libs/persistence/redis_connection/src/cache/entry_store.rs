use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::Instant;
use tracing::trace;

use super::r#trait::{CacheResult, SharedCache};
use crate::config::EntryStoreConfig;

/// Stand-in expiry for TTLs too large to add to the clock.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Immutable once built; an update replaces the whole entry.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Bytes,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: Bytes, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            expires_at: now.checked_add(ttl).unwrap_or(now + FAR_FUTURE),
        }
    }

    fn is_live(&self, now: Instant) -> bool { now < self.expires_at }
}

/// Bounded process-local cache (L1).
///
/// Expired entries are dropped lazily on `get`; nothing sweeps in the
/// background. When a new key arrives at capacity, the entry with the
/// earliest expiry is evicted inside the same critical section as the
/// insert. That victim search is a linear scan, O(capacity) per eviction,
/// which is fine for the ~10^3 entries this store is sized for; a larger
/// capacity would want an expiry-ordered index next to the map.
///
/// The lock only ever guards map mutation; it is never held across an
/// `.await`. A store built with capacity 0 holds nothing.
pub struct EntryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    capacity: usize,
}

impl EntryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn from_config(config: &EntryStoreConfig) -> Self {
        Self::new(config.capacity)
    }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn len(&self) -> usize { self.entries().len() }

    pub fn is_empty(&self) -> bool { self.entries().is_empty() }

    pub fn put(&self, key: &str, value: Bytes, ttl: Duration) {
        if self.capacity == 0 {
            return;
        }
        let entry = CacheEntry::new(value, ttl);
        let mut entries = self.entries();

        if !entries.contains_key(key) && entries.len() >= self.capacity {
            if let Some(victim) = Self::earliest_expiry(&entries) {
                trace!(%victim, "evicting earliest-expiring L1 entry");
                entries.remove(&victim);
            }
        }

        entries.insert(key.to_owned(), entry);
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        let now = Instant::now();
        let mut entries = self.entries();

        match entries.get(key) {
            Some(entry) if entry.is_live(now) => {
                return Some(entry.value.clone());
            }
            Some(_) => {}
            None => return None,
        }

        entries.remove(key);
        None
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries().remove(key).is_some()
    }

    /// Rebuilds a live entry with a fresh expiry.
    pub fn touch(&self, key: &str, ttl: Duration) -> bool {
        let now = Instant::now();
        let mut entries = self.entries();

        let Some(entry) = entries.get(key).filter(|e| e.is_live(now)) else {
            return false;
        };
        let replacement = CacheEntry::new(entry.value.clone(), ttl);
        entries.insert(key.to_owned(), replacement);
        true
    }

    /// Expiry of a stored entry, live or not. Does not purge.
    pub fn expires_at(&self, key: &str) -> Option<Instant> {
        self.entries().get(key).map(|e| e.expires_at)
    }

    pub fn clear(&self) { self.entries().clear(); }

    fn earliest_expiry(entries: &HashMap<String, CacheEntry>) -> Option<String> {
        entries
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone())
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SharedCache for EntryStore {
    async fn set(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()> {
        self.put(key, value, ttl);
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        Ok(EntryStore::get(self, key))
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(self.remove(key))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        Ok(self.touch(key, ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    fn bytes(s: &'static str) -> Bytes { Bytes::from_static(s.as_bytes()) }

    #[tokio::test(start_paused = true)]
    async fn test_entry_is_live_until_ttl_elapses() {
        let store = EntryStore::new(4);
        let ttl = Duration::from_secs(10);
        let epsilon = Duration::from_millis(1);
        store.put("event:1", bytes("v1"), ttl);

        tokio::time::advance(ttl - epsilon).await;
        assert_eq!(store.get("event:1"), Some(bytes("v1")));

        tokio::time::advance(epsilon * 2).await;
        assert_eq!(store.get("event:1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_removed_on_read() {
        let store = EntryStore::new(4);
        store.put("event:1", bytes("v1"), Duration::from_secs(1));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(store.len(), 1);
        assert!(store.get("event:1").is_none());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_is_never_exceeded() {
        let store = EntryStore::new(3);
        for i in 0..20u64 {
            let key = format!("event:{i}");
            store.put(&key, bytes("v"), Duration::from_secs(i % 5 + 1));
            assert!(store.len() <= 3);
        }
        assert_eq!(store.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evicts_exactly_the_earliest_expiry() {
        let store = EntryStore::new(3);
        store.put("a", bytes("a"), MINUTE * 3);
        store.put("b", bytes("b"), MINUTE);
        store.put("c", bytes("c"), MINUTE * 2);

        store.put("d", bytes("d"), MINUTE * 4);

        assert_eq!(store.len(), 3);
        assert!(store.get("b").is_none());
        assert!(store.get("a").is_some());
        assert!(store.get("c").is_some());
        assert!(store.get("d").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacing_a_key_at_capacity_does_not_evict() {
        let store = EntryStore::new(2);
        store.put("a", bytes("a1"), MINUTE);
        store.put("b", bytes("b"), MINUTE * 2);

        store.put("a", bytes("a2"), MINUTE * 3);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), Some(bytes("a2")));
        assert_eq!(store.get("b"), Some(bytes("b")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_eviction_below_capacity() {
        let store = EntryStore::new(10);
        store.put("short", bytes("s"), Duration::from_millis(5));
        for i in 0..8 {
            store.put(&format!("k{i}"), bytes("v"), MINUTE);
        }
        assert_eq!(store.len(), 9);
        assert!(store.get("short").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_are_evicted_first() {
        let store = EntryStore::new(2);
        store.put("stale", bytes("s"), Duration::from_secs(1));
        store.put("fresh", bytes("f"), MINUTE);
        tokio::time::advance(Duration::from_secs(5)).await;

        store.put("new", bytes("n"), MINUTE);

        assert!(store.expires_at("stale").is_none());
        assert!(store.get("fresh").is_some());
        assert!(store.get("new").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_extends_live_entries_only() {
        let store = EntryStore::new(4);
        store.put("live", bytes("l"), Duration::from_secs(5));
        store.put("dead", bytes("d"), Duration::from_secs(1));
        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(store.touch("live", MINUTE));
        assert!(!store.touch("dead", MINUTE));
        assert!(!store.touch("missing", MINUTE));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(store.get("live").is_some());
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let store = EntryStore::new(0);
        store.put("a", bytes("a"), MINUTE);

        assert_eq!(store.len(), 0);
        assert!(store.get("a").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overflowing_ttl_saturates() {
        let store = EntryStore::new(2);
        store.put("a", bytes("a"), Duration::from_secs(u64::MAX));
        store.put("b", bytes("b"), Duration::MAX);
        assert!(store.touch("a", Duration::MAX));

        tokio::time::advance(MINUTE * 60 * 24 * 30).await;
        assert_eq!(store.get("a"), Some(bytes("a")));
        assert_eq!(store.get("b"), Some(bytes("b")));
    }

    #[tokio::test]
    async fn test_concurrent_puts_respect_capacity() {
        let store = std::sync::Arc::new(EntryStore::new(16));
        let mut handles = Vec::new();
        for worker in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..200 {
                    let key = format!("w{worker}:{i}");
                    store.put(&key, Bytes::from(key.clone()), MINUTE);
                    let _ = store.get(&key);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.len(), 16);
    }
}
