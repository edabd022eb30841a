use std::time::Duration;

pub trait DbConnectConfig: serde::de::DeserializeOwned {
    #[allow(unused)]
    fn password(&self) -> Option<&str> { None }
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn db(&self) -> u8;
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RedisDbConfig {
    #[serde(default = "host_default")]
    pub host: String,
    #[serde(default = "port_default")]
    pub port: u16,
    #[serde(default = "db_default")]
    pub db: u8,
}

/// Process-local tier (L1).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct EntryStoreConfig {
    #[serde(default = "default_memory_capacity")]
    pub capacity: usize,
    #[serde(default = "default_memory_ttl_secs")]
    pub ttl_secs: u64,
}

/// Shared tier (L2).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SharedCacheConfig {
    #[serde(default = "default_shared_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_shared_timeout_ms")]
    pub timeout_ms: u64,
    /// Only used by the in-process shared cache.
    #[serde(default = "default_shared_capacity")]
    pub capacity: u64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TieredConfig {
    #[serde(default)]
    pub memory: EntryStoreConfig,
    #[serde(default)]
    pub shared: SharedCacheConfig,
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    #[serde(default = "default_write_lock_stripes")]
    pub write_lock_stripes: usize,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct QueryCacheConfig {
    #[serde(default = "default_query_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_shared_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("L1 capacity must be greater than zero")]
    ZeroCapacity,
    #[error("At least one write lock stripe is required")]
    ZeroStripes,
    #[error("At least one cache tier is required")]
    NoTiers,
    #[error("TTL of {ttl:?} exceeds the {max:?} limit")]
    TtlTooLong { ttl: Duration, max: Duration },
    #[error(
        "Tier '{tier}' expires before the tier above it ({ttl:?} < {above:?})"
    )]
    TtlOrder {
        tier: String,
        ttl: Duration,
        above: Duration,
    },
}

impl DbConnectConfig for RedisDbConfig {
    fn password(&self) -> Option<&str> { None }

    fn host(&self) -> &str { &self.host }

    fn port(&self) -> u16 { self.port }

    fn db(&self) -> u8 { self.db }
}

fn host_default() -> String { "127.0.0.1".into() }
fn port_default() -> u16 { 6379 }
fn db_default() -> u8 { 0 }
fn default_memory_capacity() -> usize { 1_000 }
fn default_memory_ttl_secs() -> u64 { 60 * 60 }
fn default_shared_ttl_secs() -> u64 { 24 * 60 * 60 }
fn default_shared_timeout_ms() -> u64 { 250 }
fn default_shared_capacity() -> u64 { 100_000 }
fn default_store_timeout_ms() -> u64 { 2_000 }
fn default_write_lock_stripes() -> usize { 64 }
fn default_query_ttl_secs() -> u64 { 60 * 60 }

/// Longest TTL any tier accepts.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

fn check_ttl(ttl: Duration) -> Result<(), ConfigError> {
    if ttl > MAX_TTL {
        return Err(ConfigError::TtlTooLong { ttl, max: MAX_TTL });
    }
    Ok(())
}

impl Default for RedisDbConfig {
    fn default() -> Self {
        Self {
            host: host_default(),
            port: port_default(),
            db: db_default(),
        }
    }
}

impl Default for EntryStoreConfig {
    fn default() -> Self {
        Self {
            capacity: default_memory_capacity(),
            ttl_secs: default_memory_ttl_secs(),
        }
    }
}

impl Default for SharedCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_shared_ttl_secs(),
            timeout_ms: default_shared_timeout_ms(),
            capacity: default_shared_capacity(),
        }
    }
}

impl Default for TieredConfig {
    fn default() -> Self {
        Self {
            memory: EntryStoreConfig::default(),
            shared: SharedCacheConfig::default(),
            store_timeout_ms: default_store_timeout_ms(),
            write_lock_stripes: default_write_lock_stripes(),
        }
    }
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_query_ttl_secs(),
            timeout_ms: default_shared_timeout_ms(),
        }
    }
}

impl EntryStoreConfig {
    pub fn ttl(&self) -> Duration { Duration::from_secs(self.ttl_secs) }
}

impl SharedCacheConfig {
    pub fn ttl(&self) -> Duration { Duration::from_secs(self.ttl_secs) }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl QueryCacheConfig {
    pub fn ttl(&self) -> Duration { Duration::from_secs(self.ttl_secs) }

    pub fn validate(&self) -> Result<(), ConfigError> { check_ttl(self.ttl()) }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl TieredConfig {
    /// Reference data (venues) changes rarely: 6h in L1, 7 days in L2.
    pub fn long_lived() -> Self {
        Self {
            memory: EntryStoreConfig {
                ttl_secs: 6 * 60 * 60,
                ..EntryStoreConfig::default()
            },
            shared: SharedCacheConfig {
                ttl_secs: 7 * 24 * 60 * 60,
                ..SharedCacheConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.write_lock_stripes == 0 {
            return Err(ConfigError::ZeroStripes);
        }
        for ttl in [self.memory.ttl(), self.shared.ttl()] {
            check_ttl(ttl)?;
        }
        if self.shared.ttl() < self.memory.ttl() {
            return Err(ConfigError::TtlOrder {
                tier: "shared".into(),
                ttl: self.shared.ttl(),
                above: self.memory.ttl(),
            });
        }
        Ok(())
    }
}
