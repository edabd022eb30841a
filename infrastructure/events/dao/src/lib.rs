pub mod events;
pub mod venues;

use database_traits::dao::{FilterDao, GenericDao, InventoryDao};
use events_errors::EventError;
use events_models::{Event, EventFilters, Venue};
pub use events::EventDao;
use uuid::Uuid;
pub use venues::VenueDao;

/// Any backing store able to serve the event handlers.
pub trait EventStore:
    FilterDao<Model = Event, ID = Uuid, Error = EventError, Filters = EventFilters>
    + InventoryDao
    + 'static
{
}

impl<T> EventStore for T where
    T: FilterDao<
            Model = Event,
            ID = Uuid,
            Error = EventError,
            Filters = EventFilters,
        > + InventoryDao
        + 'static
{
}

pub trait VenueStore:
    GenericDao<Model = Venue, ID = Uuid, Error = EventError> + 'static
{
}

impl<T> VenueStore for T where
    T: GenericDao<Model = Venue, ID = Uuid, Error = EventError> + 'static
{
}
