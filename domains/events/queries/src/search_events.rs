use chrono::{DateTime, SecondsFormat, Utc};
use events_models::EventFilters;
use serde::Deserialize;

/// Free-text search over events. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchEventsQuery {
    pub query: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

impl SearchEventsQuery {
    pub fn to_filters(&self) -> EventFilters {
        EventFilters {
            text: present(&self.query),
            category: present(&self.category),
            city: present(&self.city),
            starts_after: self.start_date,
            ends_before: self.end_date,
            active_at: None,
        }
    }

    /// Named request parameters, in declaration order, absent ones omitted.
    pub fn as_params(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("query", &self.query),
            ("category", &self.category),
            ("city", &self.city),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|v| (name, v)));

        let dates = [("start_date", self.start_date), ("end_date", self.end_date)]
            .into_iter()
            .filter_map(|(name, value)| {
                value.map(|t| (name, t.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
            });

        text.chain(dates).collect()
    }
}
