use std::sync::Arc;

use events_cache_keys::EventCache;
use events_commands::InvalidateEventCommand;
use events_dao::EventStore;
use tracing::instrument;

pub struct InvalidateEventCommandHandler<S> {
    cache: Arc<EventCache<S>>,
}

impl<S> Clone for InvalidateEventCommandHandler<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<S: EventStore> InvalidateEventCommandHandler<S> {
    pub fn new(cache: Arc<EventCache<S>>) -> Self { Self { cache } }

    /// Never fails: a tier that cannot be reached keeps its copy until TTL.
    #[instrument(skip(self))]
    pub async fn execute(&self, command: InvalidateEventCommand) {
        self.cache.invalidate(&command.event_id).await;
    }
}
