pub mod fingerprint;

pub use fingerprint::SearchFingerprint;
use redis_connection::{
    cache::{QueryCache, Tiered},
    cache_key,
};
use uuid::Uuid;

// Entity keys. Entity and query namespaces never overlap.
cache_key!(EventCacheKey => "entity:event:{}"[id: Uuid]);
cache_key!(VenueCacheKey => "entity:venue:{}"[id: Uuid]);

// Search result sets, flat TTL, no entity invalidation.
cache_key!(SearchResultsCacheKey => "search:{}"[fingerprint: SearchFingerprint]);

pub type EventCache<S> = Tiered<S, EventCacheKey>;
pub type VenueCache<S> = Tiered<S, VenueCacheKey>;
pub type SearchResultsCache = QueryCache<SearchResultsCacheKey>;
