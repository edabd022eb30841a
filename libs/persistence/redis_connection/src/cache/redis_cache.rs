use std::{future::Future, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use deadpool_redis::{
    Connection, Pool,
    redis::{AsyncCommands, RedisError},
};

use super::r#trait::{CacheError, CacheResult, SharedCache};
use crate::config::SharedCacheConfig;

/// Shared tier (L2) over a deadpool Redis pool.
///
/// Every call, including pool checkout, is bounded by `timeout`.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
    timeout: Duration,
}

impl RedisCache {
    pub fn new(pool: Pool, timeout: Duration) -> Self { Self { pool, timeout } }

    pub fn from_config(pool: Pool, config: &SharedCacheConfig) -> Self {
        Self::new(pool, config.timeout())
    }

    async fn bounded<F, T>(&self, op: F) -> CacheResult<T>
    where
        F: Future<Output = CacheResult<T>>,
    {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| CacheError::Timeout(self.timeout))?
    }

    async fn connection(&self) -> CacheResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }
}

fn backend(e: RedisError) -> CacheError { CacheError::Backend(e.to_string()) }

/// Redis expiries are whole seconds; round up so nothing lives shorter than
/// asked and never send a zero TTL.
fn ttl_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

#[async_trait]
impl SharedCache for RedisCache {
    async fn set(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            conn.set_ex::<_, _, ()>(key, value.as_ref(), ttl_secs(ttl))
                .await
                .map_err(backend)
        })
        .await
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let raw: Option<Vec<u8>> = conn.get(key).await.map_err(backend)?;
            Ok(raw.map(Bytes::from))
        })
        .await
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let count: u32 = conn.del(key).await.map_err(backend)?;
            Ok(count > 0)
        })
        .await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            conn.expire(key, ttl_secs(ttl) as i64)
                .await
                .map_err(backend)
        })
        .await
    }
}
