pub mod entry_store;
pub mod memory;
pub mod query;
pub mod redis_cache;
pub mod tiered;
pub mod r#trait;
pub mod write_lock;

pub use entry_store::EntryStore;
pub use memory::MemoryCache;
pub use query::QueryCache;
pub use r#trait::{CacheError, CacheResult, SharedCache};
pub use redis_cache::RedisCache;
pub use tiered::{Tier, Tiered, TieredBuilder, TieredError};
pub use write_lock::WriteLocks;
