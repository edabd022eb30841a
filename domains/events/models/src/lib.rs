pub mod events;
pub mod filters;
pub mod venues;

pub use events::{Event, NewEvent, UpdateEvent};
pub use filters::EventFilters;
pub use venues::{Location, NewVenue, Venue};
