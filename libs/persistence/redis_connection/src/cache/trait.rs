use std::{sync::Arc, time::Duration};

use bytes::Bytes;

/// Cache-specific error type that doesn't depend on Redis
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value contract of a cache tier with per-key TTL.
///
/// Operations are assumed fallible and slow (network round trips); a
/// failure is transient and must never be read as an authoritative miss.
#[async_trait::async_trait]
pub trait SharedCache: Send + Sync {
    async fn set(&self, key: &str, value: Bytes, ttl: Duration)
    -> CacheResult<()>;

    /// `Ok(None)` when the key was never stored or has expired.
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>>;

    /// Returns whether a live entry was removed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Resets the TTL of an existing key; `false` if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool>;
}

#[async_trait::async_trait]
impl<T> SharedCache for Arc<T>
where
    T: SharedCache + ?Sized,
{
    async fn set(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()> {
        (**self).set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        (**self).delete(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        (**self).expire(key, ttl).await
    }
}
