pub mod create_event;
pub mod create_venue;
pub mod delete_event;
pub mod invalidate_event;
pub mod tickets;
pub mod update_event;

pub use create_event::CreateEventCommand;
pub use create_venue::CreateVenueCommand;
pub use delete_event::DeleteEventCommand;
pub use invalidate_event::InvalidateEventCommand;
pub use tickets::{ReleaseTicketsCommand, ReserveTicketsCommand, TicketsResponse};
pub use update_event::UpdateEventCommand;
