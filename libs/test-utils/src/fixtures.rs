use chrono::{Duration, Utc};
use events_models::{Event, Location, NewEvent, Venue};
use uuid::Uuid;

pub fn venue_fixture(city: &str) -> Venue {
    Venue::builder()
        .name(format!("{city} Arena"))
        .location(
            Location::builder()
                .latitude(52.52)
                .longitude(13.405)
                .address("Karl-Marx-Allee 1")
                .city(city)
                .country("DE")
                .postal_code("10178")
                .build(),
        )
        .description("Multi-purpose hall")
        .capacity(500)
        .amenities(vec!["parking".into(), "bar".into()])
        .build()
}

/// An event a week from now, three hours long.
pub fn event_fixture(venue_id: Uuid, available_tickets: i32) -> Event {
    let start = Utc::now() + Duration::days(7);
    Event::builder()
        .title("Jazz Night")
        .description("Late trio set")
        .category("music")
        .start_time(start)
        .end_time(start + Duration::hours(3))
        .venue_id(venue_id)
        .price(25.0)
        .available_tickets(available_tickets)
        .build()
}

pub fn new_event_fixture(venue_id: Uuid) -> NewEvent {
    let start = Utc::now() + Duration::days(3);
    NewEvent::builder()
        .title("Derby")
        .description("Local football derby")
        .category("sports")
        .start_time(start)
        .end_time(start + Duration::hours(2))
        .venue_id(venue_id)
        .price(40.0)
        .available_tickets(100)
        .build()
}
