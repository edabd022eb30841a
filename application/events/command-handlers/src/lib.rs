pub mod create_event;
pub mod create_venue;
pub mod delete_event;
pub mod invalidate_event;
pub mod tickets;
pub mod update_event;
mod validation;

pub use create_event::CreateEventCommandHandler;
pub use create_venue::CreateVenueCommandHandler;
pub use delete_event::DeleteEventCommandHandler;
pub use invalidate_event::InvalidateEventCommandHandler;
pub use tickets::{ReleaseTicketsCommandHandler, ReserveTicketsCommandHandler};
pub use update_event::UpdateEventCommandHandler;
