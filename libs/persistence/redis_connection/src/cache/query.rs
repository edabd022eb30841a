use std::{fmt::Display, future::Future, sync::Arc, time::Duration};

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use super::r#trait::{CacheError, CacheResult, SharedCache};
use crate::{
    config::QueryCacheConfig,
    core::{key::CacheKeyFor, value::Json},
};

/// Single-tier cache for derived result sets keyed by a query fingerprint.
///
/// Entries are never invalidated when the underlying rows change; they
/// only age out. Every failure degrades to a miss or a skipped write.
pub struct QueryCache<K> {
    cache: Arc<dyn SharedCache>,
    ttl: Duration,
    timeout: Duration,
    key: K,
}

impl<K> QueryCache<K> {
    pub fn new(
        cache: Arc<dyn SharedCache>, key: K, config: &QueryCacheConfig,
    ) -> Self {
        Self {
            cache,
            ttl: config.ttl(),
            timeout: config.timeout(),
            key,
        }
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    #[instrument(skip_all, fields(fingerprint = %fingerprint))]
    pub async fn get_results<F, R>(&self, fingerprint: &F) -> Option<R>
    where
        F: Display + ?Sized,
        K: CacheKeyFor<F>,
        R: DeserializeOwned,
    {
        let key = self.key.key_for(fingerprint);
        let raw = match self.bounded(self.cache.get(&key)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(%key, "query cache miss");
                return None;
            }
            Err(e) => {
                warn!(%key, error = %e, "query cache read failed, treating as miss");
                return None;
            }
        };

        match Json::<R>::from_bytes(&raw) {
            Ok(Json(results)) => {
                debug!(%key, "query cache hit");
                Some(results)
            }
            Err(e) => {
                warn!(%key, error = %e, "undecodable query results, purging");
                if let Err(e) = self.bounded(self.cache.delete(&key)).await {
                    warn!(%key, error = %e, "query cache purge failed");
                }
                None
            }
        }
    }

    #[instrument(skip_all, fields(fingerprint = %fingerprint))]
    pub async fn cache_results<F, R>(&self, fingerprint: &F, results: &R)
    where
        F: Display + ?Sized,
        K: CacheKeyFor<F>,
        R: Serialize,
    {
        let key = self.key.key_for(fingerprint);
        let raw = match Json(results).to_bytes() {
            Ok(raw) => Bytes::from(raw),
            Err(e) => {
                warn!(%key, error = %e, "cannot encode query results");
                return;
            }
        };

        if let Err(e) = self.bounded(self.cache.set(&key, raw, self.ttl)).await {
            warn!(%key, error = %e, "query cache write failed");
        }
    }

    async fn bounded<Fut, T>(&self, op: Fut) -> CacheResult<T>
    where
        Fut: Future<Output = CacheResult<T>>,
    {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| CacheError::Timeout(self.timeout))?
    }
}
