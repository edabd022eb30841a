//! In-memory backing stores with the same contracts and error mapping as
//! the Postgres DAOs, plus switches to make them unreachable.

use std::{
    collections::HashMap,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use database_traits::dao::{FilterDao, GenericDao, InventoryDao};
use events_errors::EventError;
use events_models::{Event, EventFilters, Venue};
use uuid::Uuid;

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Switches {
    reachable: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl Default for Switches {
    fn default() -> Self {
        Self {
            reachable: AtomicBool::new(true),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }
}

impl Switches {
    fn read(&self) -> Result<(), EventError> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write(&self) -> Result<(), EventError> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn check(&self) -> Result<(), EventError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(EventError::Unavailable)
        }
    }
}

#[derive(Default)]
pub struct InMemoryEventStore {
    events: Mutex<HashMap<Uuid, Event>>,
    venue_cities: Mutex<HashMap<Uuid, String>>,
    switches: Switches,
}

impl InMemoryEventStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let store = Self::default();
        locked(&store.events).extend(events.into_iter().map(|e| (e.id, e)));
        store
    }

    /// Lets city filters resolve without a venue store.
    pub fn set_venue_city(&self, venue_id: Uuid, city: impl Into<String>) {
        locked(&self.venue_cities).insert(venue_id, city.into());
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.switches.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Single-row and filter reads served so far.
    pub fn reads(&self) -> usize { self.switches.reads.load(Ordering::SeqCst) }

    pub fn writes(&self) -> usize { self.switches.writes.load(Ordering::SeqCst) }

    /// Direct look at the stored row, bypassing counters and reachability.
    pub fn peek(&self, id: &Uuid) -> Option<Event> {
        locked(&self.events).get(id).cloned()
    }

    /// Changes a row behind every cache's back.
    pub fn overwrite(&self, event: Event) {
        locked(&self.events).insert(event.id, event);
    }
}

#[async_trait]
impl GenericDao for InMemoryEventStore {
    type Error = EventError;
    type ID = Uuid;
    type Model = Event;

    fn id_of(model: &Event) -> Uuid { model.id }

    async fn insert(&self, model: &Event) -> Result<Uuid, EventError> {
        self.switches.write()?;
        let mut events = locked(&self.events);
        if events.contains_key(&model.id) {
            return Err(EventError::Persistence(format!(
                "duplicate event id {}",
                model.id
            )));
        }
        events.insert(model.id, model.clone());
        Ok(model.id)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Event>, EventError> {
        self.switches.read()?;
        Ok(locked(&self.events).get(id).cloned())
    }

    async fn update(&self, model: &Event) -> Result<(), EventError> {
        self.switches.write()?;
        let mut events = locked(&self.events);
        let row = events
            .get_mut(&model.id)
            .ok_or(EventError::NotFound { event_id: model.id })?;
        // The ticket column is only ever moved by update_ticket_count.
        let available_tickets = row.available_tickets;
        *row = Event {
            available_tickets,
            ..model.clone()
        };
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), EventError> {
        self.switches.write()?;
        locked(&self.events)
            .remove(id)
            .map(|_| ())
            .ok_or(EventError::NotFound { event_id: *id })
    }
}

#[async_trait]
impl FilterDao for InMemoryEventStore {
    type Filters = EventFilters;

    async fn find_by_filters(
        &self, filters: &EventFilters,
    ) -> Result<Vec<Event>, EventError> {
        self.switches.read()?;
        let cities = locked(&self.venue_cities);
        let mut found: Vec<Event> = locked(&self.events)
            .values()
            .filter(|e| {
                filters.matches(e, cities.get(&e.venue_id).map(String::as_str))
            })
            .cloned()
            .collect();
        found.sort_by_key(|e| (e.start_time, e.id));
        Ok(found)
    }
}

#[async_trait]
impl InventoryDao for InMemoryEventStore {
    async fn update_ticket_count(
        &self, id: &Uuid, delta: i32,
    ) -> Result<i32, EventError> {
        self.switches.write()?;
        let mut events = locked(&self.events);
        let row = events
            .get_mut(id)
            .ok_or(EventError::NotFound { event_id: *id })?;

        // Postgres rejects an out-of-range integer instead of wrapping.
        let next = row.available_tickets.checked_add(delta).ok_or_else(|| {
            EventError::Validation(format!(
                "ticket count of event {id} out of range"
            ))
        })?;
        if next < 0 {
            return Err(EventError::InventoryExhausted {
                event_id: *id,
                requested: delta.saturating_neg(),
                available: row.available_tickets,
            });
        }
        row.available_tickets = next;
        Ok(next)
    }
}

#[derive(Default)]
pub struct InMemoryVenueStore {
    venues: Mutex<HashMap<Uuid, Venue>>,
    switches: Switches,
}

impl InMemoryVenueStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_venues(venues: impl IntoIterator<Item = Venue>) -> Self {
        let store = Self::default();
        locked(&store.venues).extend(venues.into_iter().map(|v| (v.id, v)));
        store
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.switches.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize { self.switches.reads.load(Ordering::SeqCst) }
}

#[async_trait]
impl GenericDao for InMemoryVenueStore {
    type Error = EventError;
    type ID = Uuid;
    type Model = Venue;

    fn id_of(model: &Venue) -> Uuid { model.id }

    async fn insert(&self, model: &Venue) -> Result<Uuid, EventError> {
        self.switches.write()?;
        let mut venues = locked(&self.venues);
        if venues.contains_key(&model.id) {
            return Err(EventError::Persistence(format!(
                "duplicate venue id {}",
                model.id
            )));
        }
        venues.insert(model.id, model.clone());
        Ok(model.id)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Venue>, EventError> {
        self.switches.read()?;
        Ok(locked(&self.venues).get(id).cloned())
    }

    async fn update(&self, model: &Venue) -> Result<(), EventError> {
        self.switches.write()?;
        let mut venues = locked(&self.venues);
        let row = venues
            .get_mut(&model.id)
            .ok_or(EventError::VenueNotFound { venue_id: model.id })?;
        *row = model.clone();
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), EventError> {
        self.switches.write()?;
        locked(&self.venues)
            .remove(id)
            .map(|_| ())
            .ok_or(EventError::VenueNotFound { venue_id: *id })
    }
}
