use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use moka::{Expiry, future::Cache};

use super::r#trait::{CacheResult, SharedCache};
use crate::config::SharedCacheConfig;

#[derive(Clone)]
struct MemoryEntry {
    value: Bytes,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, MemoryEntry> for PerEntryTtl {
    fn expire_after_create(
        &self, _key: &String, value: &MemoryEntry, _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self, _key: &String, value: &MemoryEntry, _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process stand-in for the shared tier, backed by moka.
///
/// Unlike Redis it does not survive a restart; it exists for single-node
/// deployments and local runs where no Redis is configured.
#[derive(Clone)]
pub struct MemoryCache {
    memory: Cache<String, MemoryEntry>,
}

impl MemoryCache {
    pub fn new(capacity: u64) -> Self {
        let memory = Cache::builder()
            .max_capacity(capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { memory }
    }

    pub fn from_config(config: &SharedCacheConfig) -> Self {
        Self::new(config.capacity)
    }
}

#[async_trait]
impl SharedCache for MemoryCache {
    async fn set(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()> {
        self.memory
            .insert(key.to_string(), MemoryEntry { value, ttl })
            .await;
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        Ok(self.memory.get(key).await.map(|entry| entry.value))
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(self.memory.remove(key).await.is_some())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        // moka has no in-place TTL update; re-inserting re-runs the expiry.
        let Some(entry) = self.memory.get(key).await
        else {
            return Ok(false);
        };
        self.memory
            .insert(key.to_string(), MemoryEntry { ttl, ..entry })
            .await;
        Ok(true)
    }
}
