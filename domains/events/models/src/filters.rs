use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-level search predicates. Every field is optional and the present
/// ones are combined with AND.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilters {
    /// Case-insensitive substring match on title or description.
    pub text: Option<String>,
    pub category: Option<String>,
    /// City of the hosting venue.
    pub city: Option<String>,
    pub starts_after: Option<DateTime<Utc>>,
    pub ends_before: Option<DateTime<Utc>>,
    /// Events whose window contains this instant.
    pub active_at: Option<DateTime<Utc>>,
}

impl EventFilters {
    pub fn is_empty(&self) -> bool { self == &Self::default() }

    pub fn matches(&self, event: &crate::Event, venue_city: Option<&str>) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            if !event.title.to_lowercase().contains(&needle)
                && !event.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if self.category.as_ref().is_some_and(|c| c != &event.category) {
            return false;
        }
        if let Some(city) = &self.city {
            if venue_city != Some(city.as_str()) {
                return false;
            }
        }
        if self.starts_after.is_some_and(|t| event.start_time < t) {
            return false;
        }
        if self.ends_before.is_some_and(|t| event.end_time > t) {
            return false;
        }
        if self.active_at.is_some_and(|t| !event.is_ongoing(t)) {
            return false;
        }
        true
    }
}
