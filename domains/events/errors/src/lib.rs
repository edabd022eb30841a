use std::time::Duration;

use redis_connection::cache::TieredError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Database error: {0}")]
    Database(#[from] sql_connection::PgError),
    #[error("Connection error: {0}")]
    Connection(#[from] sql_connection::PoolError),
    #[error("Event not found: {event_id}")]
    NotFound { event_id: Uuid },
    #[error("Venue not found: {venue_id}")]
    VenueNotFound { venue_id: Uuid },
    #[error("Persistence failure: {0}")]
    Persistence(String),
    #[error(
        "Not enough tickets for event {event_id}: requested {requested}, \
         {available} available"
    )]
    InventoryExhausted {
        event_id: Uuid,
        requested: i32,
        available: i32,
    },
    #[error("Ticket quantity must be positive, got {0}")]
    InvalidQuantity(i32),
    #[error("Invalid event: {0}")]
    Validation(String),
    #[error("Backing store unavailable")]
    Unavailable,
    #[error("Backing store timed out after {0:?}")]
    Timeout(Duration),
}

impl EventError {
    /// Expected business outcomes, as opposed to infrastructure faults.
    pub fn is_business_outcome(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::VenueNotFound { .. }
                | Self::InventoryExhausted { .. }
                | Self::InvalidQuantity(_)
                | Self::Validation(_)
        )
    }
}

impl From<TieredError<EventError>> for EventError {
    fn from(err: TieredError<EventError>) -> Self {
        match err {
            TieredError::Store(inner) => inner,
            TieredError::StoreTimeout(after) => Self::Timeout(after),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiered_errors_unwrap_to_store_error() {
        let id = Uuid::now_v7();
        let err: EventError =
            TieredError::Store(EventError::NotFound { event_id: id }).into();
        assert!(matches!(err, EventError::NotFound { event_id } if event_id == id));

        let err: EventError =
            TieredError::<EventError>::StoreTimeout(Duration::from_secs(2)).into();
        assert!(matches!(err, EventError::Timeout(_)));
        assert!(!err.is_business_outcome());
    }

    #[test]
    fn test_exhaustion_message_names_counts() {
        let err = EventError::InventoryExhausted {
            event_id: Uuid::nil(),
            requested: 3,
            available: 1,
        };
        assert!(err.is_business_outcome());
        assert!(err.to_string().contains("requested 3, 1 available"));
    }
}
