use std::sync::Arc;

use events_cache_keys::VenueCache;
use events_dao::VenueStore;
use events_errors::EventError;
use events_models::Venue;
use events_queries::GetVenueQuery;
use tracing::instrument;

/// Venue read-through. Venues are reference data, so the cache behind this
/// handler is normally built with long-lived TTLs.
pub struct GetVenueQueryHandler<V> {
    cache: Arc<VenueCache<V>>,
}

impl<V> Clone for GetVenueQueryHandler<V> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<V: VenueStore> GetVenueQueryHandler<V> {
    pub fn new(cache: Arc<VenueCache<V>>) -> Self { Self { cache } }

    #[instrument(skip(self))]
    pub async fn execute(&self, query: GetVenueQuery) -> Result<Venue, EventError> {
        self.cache
            .resolve(&query.venue_id)
            .await?
            .ok_or(EventError::VenueNotFound {
                venue_id: query.venue_id,
            })
    }
}
