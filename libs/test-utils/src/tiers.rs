use std::{sync::Arc, time::Duration};

use redis_connection::{
    cache::{EntryStore, TieredBuilder},
    config::TieredConfig,
};

use crate::faulty_cache::FaultySharedCache;

pub const TEST_L1_TTL: Duration = Duration::from_secs(60);
pub const TEST_L2_TTL: Duration = Duration::from_secs(600);

/// Two in-process tiers standing in for L1 and Redis. The shared tier can
/// be broken on demand through `l2`.
pub struct TestTiers {
    pub l1: Arc<EntryStore>,
    pub l2: Arc<FaultySharedCache<Arc<EntryStore>>>,
    pub l2_store: Arc<EntryStore>,
}

impl TestTiers {
    pub fn new() -> Self {
        let l2_store = Arc::new(EntryStore::new(10_000));
        Self {
            l1: Arc::new(EntryStore::new(100)),
            l2: Arc::new(FaultySharedCache::new(l2_store.clone())),
            l2_store,
        }
    }

    pub fn config() -> TieredConfig {
        let mut config = TieredConfig::default();
        config.memory.ttl_secs = TEST_L1_TTL.as_secs();
        config.shared.ttl_secs = TEST_L2_TTL.as_secs();
        config.shared.timeout_ms = 50;
        config.store_timeout_ms = 500;
        config
    }

    pub fn builder(&self) -> TieredBuilder {
        TieredBuilder::new(Self::config())
            .add_memory(self.l1.clone())
            .add_shared(self.l2.clone())
    }

    /// Raw bytes under `key` in each tier.
    pub fn cached(&self, key: &str) -> (Option<bytes::Bytes>, Option<bytes::Bytes>) {
        (
            EntryStore::get(&self.l1, key),
            EntryStore::get(&self.l2_store, key),
        )
    }
}

impl Default for TestTiers {
    fn default() -> Self { Self::new() }
}
