use std::sync::Arc;

use database_traits::dao::InventoryDao;
use events_cache_keys::EventCache;
use events_commands::{
    ReleaseTicketsCommand, ReserveTicketsCommand, TicketsResponse,
};
use events_dao::EventStore;
use events_errors::EventError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::validation::validate_quantity;

/// Adjusts the stored count atomically, then drops every cached copy.
/// The cached count is never consulted.
async fn adjust<S: EventStore>(
    cache: &EventCache<S>, event_id: Uuid, delta: i32,
) -> Result<TicketsResponse, EventError> {
    let available_tickets = cache
        .mutate_then_invalidate(&event_id, move |store| {
            async move { store.update_ticket_count(&event_id, delta).await }
        })
        .await?;

    Ok(TicketsResponse {
        event_id,
        available_tickets,
    })
}

pub struct ReserveTicketsCommandHandler<S> {
    cache: Arc<EventCache<S>>,
}

impl<S> Clone for ReserveTicketsCommandHandler<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<S: EventStore> ReserveTicketsCommandHandler<S> {
    pub fn new(cache: Arc<EventCache<S>>) -> Self { Self { cache } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: ReserveTicketsCommand,
    ) -> Result<TicketsResponse, EventError> {
        let quantity = validate_quantity(command.quantity)?;
        let response = adjust(&self.cache, command.event_id, -quantity).await?;
        info!(
            event.id = %command.event_id,
            quantity,
            remaining = response.available_tickets,
            "tickets reserved"
        );
        Ok(response)
    }
}

pub struct ReleaseTicketsCommandHandler<S> {
    cache: Arc<EventCache<S>>,
}

impl<S> Clone for ReleaseTicketsCommandHandler<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<S: EventStore> ReleaseTicketsCommandHandler<S> {
    pub fn new(cache: Arc<EventCache<S>>) -> Self { Self { cache } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: ReleaseTicketsCommand,
    ) -> Result<TicketsResponse, EventError> {
        let quantity = validate_quantity(command.quantity)?;
        let response = adjust(&self.cache, command.event_id, quantity).await?;
        info!(
            event.id = %command.event_id,
            quantity,
            remaining = response.available_tickets,
            "tickets released"
        );
        Ok(response)
    }
}
