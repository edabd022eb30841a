use std::{borrow::Cow, future::Future, sync::Arc, time::Duration};

use bytes::Bytes;
use database_traits::dao::GenericDao;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use super::{
    entry_store::EntryStore,
    r#trait::{CacheError, CacheResult, SharedCache},
    write_lock::WriteLocks,
};
use crate::{
    config::{ConfigError, TieredConfig},
    core::{key::CacheKeyFor, value::Json},
};

#[derive(Debug, thiserror::Error)]
pub enum TieredError<E> {
    #[error("Backing store error: {0}")]
    Store(E),
    #[error("Backing store timed out after {0:?}")]
    StoreTimeout(Duration),
}

/// One layer of the hierarchy with its own TTL.
///
/// Tier failures are logged and swallowed here: a failed read is a miss for
/// this tier only, a failed write leaves the tier to catch up on expiry.
pub struct Tier {
    name: Cow<'static, str>,
    cache: Arc<dyn SharedCache>,
    ttl: Duration,
    timeout: Option<Duration>,
}

impl Tier {
    pub fn new(
        name: impl Into<Cow<'static, str>>, cache: Arc<dyn SharedCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            cache,
            ttl,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn ttl(&self) -> Duration { self.ttl }

    async fn bounded<F, T>(&self, op: F) -> CacheResult<T>
    where
        F: Future<Output = CacheResult<T>>,
    {
        match self.timeout {
            Some(limit) => {
                tokio::time::timeout(limit, op)
                    .await
                    .map_err(|_| CacheError::Timeout(limit))?
            }
            None => op.await,
        }
    }

    async fn load(&self, key: &str) -> Option<Bytes> {
        match self.bounded(self.cache.get(key)).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(
                    tier = %self.name, %key, error = %e,
                    "cache tier read failed, treating as miss"
                );
                None
            }
        }
    }

    async fn store(&self, key: &str, value: Bytes) {
        if let Err(e) = self.bounded(self.cache.set(key, value, self.ttl)).await
        {
            warn!(tier = %self.name, %key, error = %e, "cache tier write failed");
        }
    }

    async fn evict(&self, key: &str) {
        if let Err(e) = self.bounded(self.cache.delete(key)).await {
            warn!(
                tier = %self.name, %key, error = %e,
                "cache tier invalidation failed"
            );
        }
    }
}

/// Read-through / write-through coordinator over an ordered list of tiers
/// (fastest first) in front of an authoritative store.
///
/// Reads walk the tiers until one hits and backfill every tier above it;
/// a full miss reads the store and fills all tiers. Writes reach the store
/// first and only touch the tiers once the store has accepted them.
/// "Not found" is never cached.
///
/// A read only backfills if no write to the id's stripe landed since the
/// read started, so a slow reader cannot reinstate a value that a write or
/// invalidation has already replaced.
pub struct Tiered<S, K> {
    tiers: Vec<Tier>,
    store: S,
    key: K,
    locks: WriteLocks,
    store_timeout: Duration,
}

impl<S, K> Tiered<S, K>
where
    S: GenericDao,
    S::Model: Serialize + DeserializeOwned,
    K: CacheKeyFor<S::ID>,
{
    pub fn builder(config: TieredConfig) -> TieredBuilder {
        TieredBuilder::new(config)
    }

    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(Tier::name).collect()
    }

    pub fn tier_count(&self) -> usize { self.tiers.len() }

    pub fn key_for(&self, id: &S::ID) -> Cow<'static, str> {
        self.key.key_for(id)
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn resolve(
        &self, id: &S::ID,
    ) -> Result<Option<S::Model>, TieredError<S::Error>> {
        let key = self.key.key_for(id);
        let seen = self.locks.generation(id);

        for (depth, tier) in self.tiers.iter().enumerate() {
            let Some(raw) = tier.load(&key).await
            else {
                continue;
            };

            match Json::<S::Model>::from_bytes(&raw) {
                Ok(Json(model)) => {
                    debug!(tier = tier.name(), %key, "cache hit");
                    if depth > 0 {
                        self.backfill(id, seen, &self.tiers[..depth], &key, raw)
                            .await;
                    }
                    return Ok(Some(model));
                }
                Err(e) => {
                    warn!(
                        tier = tier.name(), %key, error = %e,
                        "undecodable cache payload, purging"
                    );
                    tier.evict(&key).await;
                }
            }
        }

        debug!(%key, "miss on every tier, reading backing store");
        let found = self.bounded_store(self.store.find_by_id(id)).await?;
        if let Some(raw) = found.as_ref().and_then(|model| encode(&key, model)) {
            self.backfill(id, seen, &self.tiers, &key, raw).await;
        }
        Ok(found)
    }

    #[instrument(skip_all, fields(id = %S::id_of(model)))]
    pub async fn create(
        &self, model: &S::Model,
    ) -> Result<S::ID, TieredError<S::Error>> {
        let _guard = self.locks.lock(&S::id_of(model)).await;

        let id = self.bounded_store(self.store.insert(model)).await?;
        self.locks.advance(&id);
        self.populate(&self.key.key_for(&id), model).await;
        Ok(id)
    }

    /// Write-through. The tiers receive the row as the store holds it after
    /// the update, since a store may leave some columns of `model` unwritten.
    /// If that row cannot be read back the tiers are cleared instead.
    #[instrument(skip_all, fields(id = %S::id_of(model)))]
    pub async fn update(
        &self, model: &S::Model,
    ) -> Result<(), TieredError<S::Error>> {
        let id = S::id_of(model);
        let _guard = self.locks.lock(&id).await;

        self.bounded_store(self.store.update(model)).await?;
        self.locks.advance(&id);

        let key = self.key.key_for(&id);
        match self.bounded_store(self.store.find_by_id(&id)).await {
            Ok(Some(persisted)) => self.populate(&key, &persisted).await,
            Ok(None) => self.evict_all(&key).await,
            Err(_) => {
                warn!(%key, "cannot read back updated row, clearing tiers");
                self.evict_all(&key).await;
            }
        }
        Ok(())
    }

    /// Reads the authoritative row, applies `change`, and writes it through,
    /// all under the id's write lock. `Ok(None)` when the row is absent.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update_with<F>(
        &self, id: &S::ID, change: F,
    ) -> Result<Option<S::Model>, TieredError<S::Error>>
    where
        F: FnOnce(S::Model) -> Result<S::Model, S::Error>,
    {
        let _guard = self.locks.lock(id).await;

        let Some(current) = self.bounded_store(self.store.find_by_id(id)).await?
        else {
            return Ok(None);
        };
        let updated = change(current).map_err(TieredError::Store)?;

        self.bounded_store(self.store.update(&updated)).await?;
        self.locks.advance(id);
        self.populate(&self.key.key_for(id), &updated).await;
        Ok(Some(updated))
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete(&self, id: &S::ID) -> Result<(), TieredError<S::Error>> {
        let _guard = self.locks.lock(id).await;

        self.bounded_store(self.store.delete(id)).await?;
        self.locks.advance(id);
        self.evict_all(&self.key.key_for(id)).await;
        Ok(())
    }

    /// Drops the id from every tier without touching the store.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn invalidate(&self, id: &S::ID) {
        let _guard = self.locks.lock(id).await;
        self.locks.advance(id);
        self.evict_all(&self.key.key_for(id)).await;
    }

    /// Runs a store mutation under the id's write lock and, if it succeeds,
    /// invalidates every tier. Nothing is repopulated.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn mutate_then_invalidate<'a, F, Fut, R>(
        &'a self, id: &S::ID, op: F,
    ) -> Result<R, TieredError<S::Error>>
    where
        F: FnOnce(&'a S) -> Fut,
        Fut: Future<Output = Result<R, S::Error>>,
    {
        let _guard = self.locks.lock(id).await;

        let outcome = self.bounded_store(op(&self.store)).await?;
        self.locks.advance(id);
        self.evict_all(&self.key.key_for(id)).await;
        Ok(outcome)
    }

    /// Uncached store read with the same timeout as every other store call.
    pub async fn read_store<'a, F, Fut, R>(
        &'a self, op: F,
    ) -> Result<R, TieredError<S::Error>>
    where
        F: FnOnce(&'a S) -> Fut,
        Fut: Future<Output = Result<R, S::Error>>,
    {
        self.bounded_store(op(&self.store)).await
    }

    async fn populate(&self, key: &str, model: &S::Model) {
        let Some(raw) = encode(key, model) else {
            return;
        };
        // Bottom-up, so a faster tier never holds what a slower one lacks.
        for tier in self.tiers.iter().rev() {
            tier.store(key, raw.clone()).await;
        }
    }

    /// Fills `tiers` with what a read found, unless a write to the stripe
    /// landed after the read took its `seen` snapshot. The check and the
    /// fill run under the stripe lock so no write can slip in between.
    async fn backfill(
        &self, id: &S::ID, seen: u64, tiers: &[Tier], key: &str, raw: Bytes,
    ) {
        let _guard = self.locks.lock(id).await;
        if self.locks.generation(id) != seen {
            debug!(%key, "written during read, skipping backfill");
            return;
        }
        for tier in tiers.iter().rev() {
            tier.store(key, raw.clone()).await;
        }
    }

    async fn evict_all(&self, key: &str) {
        for tier in self.tiers.iter().rev() {
            tier.evict(key).await;
        }
    }

    async fn bounded_store<F, R>(
        &self, op: F,
    ) -> Result<R, TieredError<S::Error>>
    where
        F: Future<Output = Result<R, S::Error>>,
    {
        match tokio::time::timeout(self.store_timeout, op).await {
            Ok(result) => result.map_err(TieredError::Store),
            Err(_) => {
                warn!(timeout = ?self.store_timeout, "backing store call timed out");
                Err(TieredError::StoreTimeout(self.store_timeout))
            }
        }
    }
}

fn encode<T: Serialize>(key: &str, model: &T) -> Option<Bytes> {
    match Json(model).to_bytes() {
        Ok(raw) => Some(Bytes::from(raw)),
        Err(e) => {
            warn!(%key, error = %e, "cannot encode value, tiers left as is");
            None
        }
    }
}

/// Assembles the tier list, fastest tier first.
pub struct TieredBuilder {
    config: TieredConfig,
    tiers: Vec<Tier>,
    memory_capacities: Vec<usize>,
}

impl TieredBuilder {
    pub fn new(config: TieredConfig) -> Self {
        Self {
            config,
            tiers: Vec::new(),
            memory_capacities: Vec::new(),
        }
    }

    pub fn add_tier(mut self, tier: Tier) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Process-local tier using the configured L1 TTL. The store's own
    /// capacity is checked at `build`.
    pub fn add_memory(mut self, store: Arc<EntryStore>) -> Self {
        let ttl = self.config.memory.ttl();
        self.memory_capacities.push(store.capacity());
        self.add_tier(Tier::new("memory", store, ttl))
    }

    /// Shared tier using the configured L2 TTL and timeout.
    pub fn add_shared(self, cache: Arc<dyn SharedCache>) -> Self {
        let tier = Tier::new("shared", cache, self.config.shared.ttl())
            .with_timeout(self.config.shared.timeout());
        self.add_tier(tier)
    }

    pub fn build<S, K>(self, store: S, key: K) -> Result<Tiered<S, K>, ConfigError> {
        self.config.validate()?;
        if self.tiers.is_empty() {
            return Err(ConfigError::NoTiers);
        }
        if self.memory_capacities.contains(&0) {
            return Err(ConfigError::ZeroCapacity);
        }
        for pair in self.tiers.windows(2) {
            if pair[1].ttl < pair[0].ttl {
                return Err(ConfigError::TtlOrder {
                    tier: pair[1].name.to_string(),
                    ttl: pair[1].ttl,
                    above: pair[0].ttl,
                });
            }
        }

        Ok(Tiered {
            tiers: self.tiers,
            store,
            key,
            locks: WriteLocks::new(self.config.write_lock_stripes),
            store_timeout: self.config.store_timeout(),
        })
    }
}
