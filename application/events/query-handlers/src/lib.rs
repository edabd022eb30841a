pub mod get_event;
pub mod get_venue;
pub mod list_events;
pub mod search_events;

pub use get_event::GetEventQueryHandler;
pub use get_venue::GetVenueQueryHandler;
pub use list_events::{
    EventsByCategoryQueryHandler, GetAllEventsQueryHandler,
    OngoingEventsQueryHandler, UpcomingEventsQueryHandler,
};
pub use search_events::SearchEventsQueryHandler;
