use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct Event {
    #[builder(default = Uuid::now_v7())]
    pub id: Uuid,
    #[builder(setter(into))]
    pub title: String,
    #[builder(default, setter(into))]
    pub description: String,
    #[builder(setter(into))]
    pub category: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub venue_id: Uuid,
    #[builder(default)]
    pub price: f64,
    #[builder(default)]
    pub available_tickets: i32,
}

impl Event {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }

    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    /// Applies the present fields of `changes`. The ticket count is left
    /// alone; it only moves through reservations.
    pub fn apply(mut self, changes: UpdateEvent) -> Self {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(start_time) = changes.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = changes.end_time {
            self.end_time = end_time;
        }
        if let Some(venue_id) = changes.venue_id {
            self.venue_id = venue_id;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        self
    }
}

/// Creation payload; the id is assigned when the event is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct NewEvent {
    #[builder(setter(into))]
    pub title: String,
    #[builder(default, setter(into))]
    pub description: String,
    #[builder(setter(into))]
    pub category: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub venue_id: Uuid,
    #[builder(default)]
    pub price: f64,
    #[builder(default)]
    pub available_tickets: i32,
}

impl NewEvent {
    pub fn into_event(self, id: Uuid) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            start_time: self.start_time,
            end_time: self.end_time,
            venue_id: self.venue_id,
            price: self.price,
            available_tickets: self.available_tickets,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub venue_id: Option<Uuid>,
    pub price: Option<f64>,
}

impl UpdateEvent {
    pub fn is_empty(&self) -> bool { self == &Self::default() }
}
