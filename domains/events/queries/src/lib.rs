pub mod get_event;
pub mod get_venue;
pub mod list_events;
pub mod search_events;

pub use get_event::GetEventQuery;
pub use get_venue::GetVenueQuery;
pub use list_events::{
    EventsByCategoryQuery, GetAllEventsQuery, OngoingEventsQuery,
    UpcomingEventsQuery,
};
pub use search_events::SearchEventsQuery;
