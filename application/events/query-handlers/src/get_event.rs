use std::sync::Arc;

use events_cache_keys::EventCache;
use events_dao::EventStore;
use events_errors::EventError;
use events_models::Event;
use events_queries::GetEventQuery;
use tracing::instrument;

pub struct GetEventQueryHandler<S> {
    cache: Arc<EventCache<S>>,
}

impl<S> Clone for GetEventQueryHandler<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<S: EventStore> GetEventQueryHandler<S> {
    pub fn new(cache: Arc<EventCache<S>>) -> Self { Self { cache } }

    #[instrument(skip(self))]
    pub async fn execute(&self, query: GetEventQuery) -> Result<Event, EventError> {
        self.cache
            .resolve(&query.event_id)
            .await?
            .ok_or(EventError::NotFound {
                event_id: query.event_id,
            })
    }
}
