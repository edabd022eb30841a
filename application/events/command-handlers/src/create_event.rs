use std::sync::Arc;

use events_cache_keys::EventCache;
use events_commands::CreateEventCommand;
use events_dao::EventStore;
use events_errors::EventError;
use events_models::Event;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::validation::validate_event;

pub struct CreateEventCommandHandler<S> {
    cache: Arc<EventCache<S>>,
}

impl<S> Clone for CreateEventCommandHandler<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<S: EventStore> CreateEventCommandHandler<S> {
    pub fn new(cache: Arc<EventCache<S>>) -> Self { Self { cache } }

    /// Persists a new event under a fresh UUIDv7 and writes it through to
    /// every tier. Nothing is cached if the store refuses the row.
    #[instrument(skip_all, fields(title = %command.event.title))]
    pub async fn execute(
        &self, command: CreateEventCommand,
    ) -> Result<Event, EventError> {
        let event = command.event.into_event(Uuid::now_v7());
        validate_event(&event)?;

        self.cache.create(&event).await?;
        info!(event.id = %event.id, "event created");
        Ok(event)
    }
}
