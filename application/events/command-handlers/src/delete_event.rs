use std::sync::Arc;

use events_cache_keys::EventCache;
use events_commands::DeleteEventCommand;
use events_dao::EventStore;
use events_errors::EventError;
use tracing::{info, instrument};

pub struct DeleteEventCommandHandler<S> {
    cache: Arc<EventCache<S>>,
}

impl<S> Clone for DeleteEventCommandHandler<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<S: EventStore> DeleteEventCommandHandler<S> {
    pub fn new(cache: Arc<EventCache<S>>) -> Self { Self { cache } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: DeleteEventCommand,
    ) -> Result<(), EventError> {
        self.cache.delete(&command.event_id).await?;
        info!(event.id = %command.event_id, "event deleted");
        Ok(())
    }
}
