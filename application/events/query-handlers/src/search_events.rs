use std::sync::Arc;

use database_traits::dao::FilterDao;
use events_cache_keys::{EventCache, SearchFingerprint, SearchResultsCache};
use events_dao::EventStore;
use events_errors::EventError;
use events_models::Event;
use events_queries::SearchEventsQuery;
use tracing::{debug, instrument};

/// Search through the Query Result Cache.
///
/// Result sets are not invalidated when events change; they age out with
/// the cache's flat TTL.
pub struct SearchEventsQueryHandler<S> {
    events: Arc<EventCache<S>>,
    results: Arc<SearchResultsCache>,
}

impl<S> Clone for SearchEventsQueryHandler<S> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            results: self.results.clone(),
        }
    }
}

impl<S: EventStore> SearchEventsQueryHandler<S> {
    pub fn new(
        events: Arc<EventCache<S>>, results: Arc<SearchResultsCache>,
    ) -> Self {
        Self { events, results }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: SearchEventsQuery,
    ) -> Result<Vec<Event>, EventError> {
        let fingerprint = SearchFingerprint::from_query(&query);
        if let Some(cached) = self.results.get_results(&fingerprint).await {
            return Ok(cached);
        }

        let filters = query.to_filters();
        let found = self
            .events
            .read_store(|store| store.find_by_filters(&filters))
            .await?;
        debug!(%fingerprint, count = found.len(), "search served by store");

        self.results.cache_results(&fingerprint, &found).await;
        Ok(found)
    }
}
