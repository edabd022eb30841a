use std::sync::Arc;

use events_cache_keys::VenueCache;
use events_commands::CreateVenueCommand;
use events_dao::VenueStore;
use events_errors::EventError;
use events_models::Venue;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::validation::validate_venue;

pub struct CreateVenueCommandHandler<V> {
    cache: Arc<VenueCache<V>>,
}

impl<V> Clone for CreateVenueCommandHandler<V> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<V: VenueStore> CreateVenueCommandHandler<V> {
    pub fn new(cache: Arc<VenueCache<V>>) -> Self { Self { cache } }

    #[instrument(skip_all, fields(name = %command.venue.name))]
    pub async fn execute(
        &self, command: CreateVenueCommand,
    ) -> Result<Venue, EventError> {
        let venue = command.venue.into_venue(Uuid::now_v7());
        validate_venue(&venue)?;

        self.cache.create(&venue).await?;
        info!(venue.id = %venue.id, "venue created");
        Ok(venue)
    }
}
