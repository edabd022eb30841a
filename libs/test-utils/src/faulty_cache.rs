use std::{
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use redis_connection::cache::{CacheError, CacheResult, SharedCache};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fault {
    #[default]
    None,
    /// Every call fails like an unreachable backend.
    Error,
    /// Every call hangs until the caller's timeout fires.
    Hang,
    /// Every call completes normally after the given delay.
    Slow(Duration),
}

/// Wraps a cache tier and injects failures on demand.
pub struct FaultySharedCache<C> {
    inner: C,
    fault: Mutex<Fault>,
    calls: AtomicUsize,
}

impl<C> FaultySharedCache<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            fault: Mutex::new(Fault::None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_fault(&self, fault: Fault) {
        *self.fault.lock().unwrap_or_else(PoisonError::into_inner) = fault;
    }

    pub fn fault(&self) -> Fault {
        *self.fault.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn inner(&self) -> &C { &self.inner }

    /// Calls seen, faulted or not.
    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    async fn inject(&self) -> CacheResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fault() {
            Fault::None => Ok(()),
            Fault::Error => {
                Err(CacheError::Backend("injected connection failure".into()))
            }
            Fault::Hang => std::future::pending().await,
            Fault::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl<C> SharedCache for FaultySharedCache<C>
where
    C: SharedCache,
{
    async fn set(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()> {
        self.inject().await?;
        self.inner.set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        self.inject().await?;
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        self.inject().await?;
        self.inner.delete(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        self.inject().await?;
        self.inner.expire(key, ttl).await
    }
}
