use events_errors::EventError;
use events_models::{Event, Venue};

pub(crate) fn validate_event(event: &Event) -> Result<(), EventError> {
    if event.title.trim().is_empty() {
        return Err(EventError::Validation("title must not be empty".into()));
    }
    if event.category.trim().is_empty() {
        return Err(EventError::Validation("category must not be empty".into()));
    }
    if event.end_time < event.start_time {
        return Err(EventError::Validation(
            "end_time must not precede start_time".into(),
        ));
    }
    if !event.price.is_finite() || event.price < 0.0 {
        return Err(EventError::Validation(format!(
            "price must be a non-negative number, got {}",
            event.price
        )));
    }
    if event.available_tickets < 0 {
        return Err(EventError::Validation(format!(
            "available_tickets must not be negative, got {}",
            event.available_tickets
        )));
    }
    Ok(())
}

pub(crate) fn validate_venue(venue: &Venue) -> Result<(), EventError> {
    if venue.name.trim().is_empty() {
        return Err(EventError::Validation("venue name must not be empty".into()));
    }
    if venue.capacity < 0 {
        return Err(EventError::Validation(format!(
            "capacity must not be negative, got {}",
            venue.capacity
        )));
    }
    let location = &venue.location;
    if !(-90.0..=90.0).contains(&location.latitude)
        || !(-180.0..=180.0).contains(&location.longitude)
    {
        return Err(EventError::Validation(format!(
            "coordinates out of range: {}, {}",
            location.latitude, location.longitude
        )));
    }
    Ok(())
}

pub(crate) fn validate_quantity(quantity: i32) -> Result<i32, EventError> {
    if quantity <= 0 {
        return Err(EventError::InvalidQuantity(quantity));
    }
    Ok(quantity)
}
