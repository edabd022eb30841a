use chrono::{DateTime, Utc};
use events_models::EventFilters;
use serde::Deserialize;

use crate::SearchEventsQuery;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetAllEventsQuery;

#[derive(Debug, Clone, Deserialize)]
pub struct EventsByCategoryQuery {
    pub category: String,
}

impl EventsByCategoryQuery {
    /// A category listing is a search with only the category set, so both
    /// share Query Result Cache entries.
    pub fn as_search(&self) -> SearchEventsQuery {
        SearchEventsQuery {
            category: Some(self.category.clone()),
            ..SearchEventsQuery::default()
        }
    }
}

/// Events starting at or after `after` (default: now).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpcomingEventsQuery {
    pub after: Option<DateTime<Utc>>,
}

impl UpcomingEventsQuery {
    pub fn to_filters(&self, now: DateTime<Utc>) -> EventFilters {
        EventFilters {
            starts_after: Some(self.after.unwrap_or(now)),
            ..EventFilters::default()
        }
    }
}

/// Events whose window contains `at` (default: now).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OngoingEventsQuery {
    pub at: Option<DateTime<Utc>>,
}

impl OngoingEventsQuery {
    pub fn to_filters(&self, now: DateTime<Utc>) -> EventFilters {
        EventFilters {
            active_at: Some(self.at.unwrap_or(now)),
            ..EventFilters::default()
        }
    }
}
