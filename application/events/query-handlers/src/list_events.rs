use std::sync::Arc;

use chrono::Utc;
use database_traits::dao::FilterDao;
use events_cache_keys::EventCache;
use events_dao::EventStore;
use events_errors::EventError;
use events_models::{Event, EventFilters};
use events_queries::{
    EventsByCategoryQuery, GetAllEventsQuery, OngoingEventsQuery,
    UpcomingEventsQuery,
};
use tracing::instrument;

use crate::SearchEventsQueryHandler;

/// Shares result sets with a search on the same category.
pub struct EventsByCategoryQueryHandler<S> {
    search: SearchEventsQueryHandler<S>,
}

impl<S> Clone for EventsByCategoryQueryHandler<S> {
    fn clone(&self) -> Self {
        Self {
            search: self.search.clone(),
        }
    }
}

impl<S: EventStore> EventsByCategoryQueryHandler<S> {
    pub fn new(search: SearchEventsQueryHandler<S>) -> Self { Self { search } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: EventsByCategoryQuery,
    ) -> Result<Vec<Event>, EventError> {
        self.search.execute(query.as_search()).await
    }
}

// The listings below are relative to "now" or unbounded, so a cached copy
// would never be hit again; they always read the store.

async fn uncached<S: EventStore>(
    events: &EventCache<S>, filters: EventFilters,
) -> Result<Vec<Event>, EventError> {
    Ok(events
        .read_store(|store| store.find_by_filters(&filters))
        .await?)
}

pub struct GetAllEventsQueryHandler<S> {
    events: Arc<EventCache<S>>,
}

impl<S> Clone for GetAllEventsQueryHandler<S> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<S: EventStore> GetAllEventsQueryHandler<S> {
    pub fn new(events: Arc<EventCache<S>>) -> Self { Self { events } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, _query: GetAllEventsQuery,
    ) -> Result<Vec<Event>, EventError> {
        uncached(&self.events, EventFilters::default()).await
    }
}

pub struct UpcomingEventsQueryHandler<S> {
    events: Arc<EventCache<S>>,
}

impl<S> Clone for UpcomingEventsQueryHandler<S> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<S: EventStore> UpcomingEventsQueryHandler<S> {
    pub fn new(events: Arc<EventCache<S>>) -> Self { Self { events } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: UpcomingEventsQuery,
    ) -> Result<Vec<Event>, EventError> {
        uncached(&self.events, query.to_filters(Utc::now())).await
    }
}

pub struct OngoingEventsQueryHandler<S> {
    events: Arc<EventCache<S>>,
}

impl<S> Clone for OngoingEventsQueryHandler<S> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<S: EventStore> OngoingEventsQueryHandler<S> {
    pub fn new(events: Arc<EventCache<S>>) -> Self { Self { events } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: OngoingEventsQuery,
    ) -> Result<Vec<Event>, EventError> {
        uncached(&self.events, query.to_filters(Utc::now())).await
    }
}
