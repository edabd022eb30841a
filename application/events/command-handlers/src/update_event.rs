use std::sync::Arc;

use events_cache_keys::EventCache;
use events_commands::UpdateEventCommand;
use events_dao::EventStore;
use events_errors::EventError;
use events_models::Event;
use tracing::instrument;

use crate::validation::validate_event;

pub struct UpdateEventCommandHandler<S> {
    cache: Arc<EventCache<S>>,
}

impl<S> Clone for UpdateEventCommandHandler<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<S: EventStore> UpdateEventCommandHandler<S> {
    pub fn new(cache: Arc<EventCache<S>>) -> Self { Self { cache } }

    /// Applies a partial update to the authoritative row and writes the
    /// result through, so the next read is served from cache.
    #[instrument(skip_all, fields(event.id = %command.event_id))]
    pub async fn execute(
        &self, command: UpdateEventCommand,
    ) -> Result<Event, EventError> {
        let event_id = command.event_id;
        let changes = command.changes;

        let updated = self
            .cache
            .update_with(&event_id, move |current| {
                let updated = current.apply(changes);
                validate_event(&updated)?;
                Ok(updated)
            })
            .await?;

        updated.ok_or(EventError::NotFound { event_id })
    }
}
