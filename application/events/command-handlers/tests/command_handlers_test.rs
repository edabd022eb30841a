use std::sync::Arc;

use events_cache_keys::{EventCache, EventCacheKey};
use events_command_handlers::{
    CreateEventCommandHandler, DeleteEventCommandHandler,
    InvalidateEventCommandHandler, ReleaseTicketsCommandHandler,
    ReserveTicketsCommandHandler, UpdateEventCommandHandler,
};
use events_commands::{
    CreateEventCommand, DeleteEventCommand, InvalidateEventCommand,
    ReleaseTicketsCommand, ReserveTicketsCommand, TicketsResponse,
    UpdateEventCommand,
};
use events_errors::EventError;
use events_models::{Event, UpdateEvent};
use redis_connection::core::key::CacheKeyFor;
use test_utils::{
    Fault, InMemoryEventStore, TestTiers, event_fixture, new_event_fixture,
};
use uuid::Uuid;

type Store = Arc<InMemoryEventStore>;

struct Harness {
    tiers: TestTiers,
    store: Store,
    cache: Arc<EventCache<Store>>,
}

impl Harness {
    fn new(events: Vec<Event>) -> Self {
        let tiers = TestTiers::new();
        let store = Arc::new(InMemoryEventStore::with_events(events));
        let cache = Arc::new(
            tiers
                .builder()
                .build(store.clone(), EventCacheKey)
                .expect("valid test tiers"),
        );
        Self {
            tiers,
            store,
            cache,
        }
    }

    /// Decoded copies held by (L1, L2).
    fn cached(&self, id: Uuid) -> (Option<Event>, Option<Event>) {
        let key = EventCacheKey.key_for(&id);
        let decode = |raw: bytes::Bytes| serde_json::from_slice(&raw).unwrap();
        let (l1, l2) = self.tiers.cached(&key);
        (l1.map(decode), l2.map(decode))
    }
}

#[tokio::test]
async fn test_created_event_is_readable_without_store() {
    let h = Harness::new(vec![]);
    let handler = CreateEventCommandHandler::new(h.cache.clone());

    let created = handler
        .execute(CreateEventCommand::from(new_event_fixture(Uuid::now_v7())))
        .await
        .unwrap();
    assert_eq!(h.store.peek(&created.id).as_ref(), Some(&created));

    h.store.set_reachable(false);
    let read = h.cache.resolve(&created.id).await.unwrap();
    assert_eq!(read, Some(created));
}

#[tokio::test]
async fn test_create_fails_closed_when_store_is_down() {
    let h = Harness::new(vec![]);
    h.store.set_reachable(false);
    let handler = CreateEventCommandHandler::new(h.cache.clone());

    let err = handler
        .execute(CreateEventCommand::from(new_event_fixture(Uuid::now_v7())))
        .await
        .unwrap_err();

    assert!(matches!(err, EventError::Unavailable));
    assert!(h.tiers.l1.is_empty());
    assert!(h.tiers.l2_store.is_empty());
}

#[tokio::test]
async fn test_invalid_event_never_reaches_store() {
    let h = Harness::new(vec![]);
    let handler = CreateEventCommandHandler::new(h.cache.clone());
    let mut event = new_event_fixture(Uuid::now_v7());
    event.end_time = event.start_time - chrono::Duration::hours(1);

    let err = handler.execute(event.into()).await.unwrap_err();
    assert!(matches!(err, EventError::Validation(_)));
    assert_eq!(h.store.writes(), 0);
}

#[tokio::test]
async fn test_update_writes_through_both_tiers() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    h.cache.resolve(&event.id).await.unwrap();

    let handler = UpdateEventCommandHandler::new(h.cache.clone());
    let updated = handler
        .execute(UpdateEventCommand {
            event_id: event.id,
            changes: UpdateEvent {
                title: Some("Jazz Night (sold out soon)".into()),
                price: Some(30.0),
                ..UpdateEvent::default()
            },
        })
        .await
        .unwrap();
    assert_eq!(updated.available_tickets, 5);

    h.store.set_reachable(false);
    let read = h.cache.resolve(&event.id).await.unwrap().unwrap();
    assert_eq!(read.title, "Jazz Night (sold out soon)");
    assert_eq!(read.price, 30.0);

    let (l1, l2) = h.cached(event.id);
    assert_eq!(l1, Some(updated.clone()));
    assert_eq!(l2, Some(updated));
}

#[tokio::test]
async fn test_direct_update_caches_stored_ticket_count() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);

    h.cache
        .update(&Event {
            title: "Jazz Night (late show)".into(),
            available_tickets: 500,
            ..event.clone()
        })
        .await
        .unwrap();

    let stored = h.store.peek(&event.id).unwrap();
    assert_eq!(stored.available_tickets, 5);
    let (l1, l2) = h.cached(event.id);
    assert_eq!(l1.as_ref(), Some(&stored));
    assert_eq!(l2.as_ref(), Some(&stored));

    h.store.set_reachable(false);
    let read = h.cache.resolve(&event.id).await.unwrap().unwrap();
    assert_eq!(read.available_tickets, 5);
    assert_eq!(read.title, "Jazz Night (late show)");
}

#[tokio::test]
async fn test_update_of_missing_event_is_not_found() {
    let h = Harness::new(vec![]);
    let handler = UpdateEventCommandHandler::new(h.cache.clone());
    let id = Uuid::now_v7();

    let err = handler
        .execute(UpdateEventCommand {
            event_id: id,
            changes: UpdateEvent::default(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EventError::NotFound { event_id } if event_id == id));
}

#[tokio::test]
async fn test_delete_clears_tiers() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    h.cache.resolve(&event.id).await.unwrap();

    DeleteEventCommandHandler::new(h.cache.clone())
        .execute(DeleteEventCommand { event_id: event.id })
        .await
        .unwrap();

    assert_eq!(h.cached(event.id), (None, None));
    let reads_before = h.store.reads();
    assert_eq!(h.cache.resolve(&event.id).await.unwrap(), None);
    assert_eq!(h.store.reads(), reads_before + 1);
}

#[tokio::test]
async fn test_invalidate_picks_up_out_of_band_changes() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    h.cache.resolve(&event.id).await.unwrap();

    h.store.overwrite(Event {
        title: "Fixed by hand".into(),
        ..event.clone()
    });
    let stale = h.cache.resolve(&event.id).await.unwrap().unwrap();
    assert_eq!(stale.title, event.title);

    InvalidateEventCommandHandler::new(h.cache.clone())
        .execute(InvalidateEventCommand { event_id: event.id })
        .await;

    assert_eq!(h.cached(event.id), (None, None));
    let fresh = h.cache.resolve(&event.id).await.unwrap().unwrap();
    assert_eq!(fresh.title, "Fixed by hand");
}

#[tokio::test]
async fn test_invalidate_survives_broken_shared_tier() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    h.cache.resolve(&event.id).await.unwrap();
    h.tiers.l2.set_fault(Fault::Error);

    InvalidateEventCommandHandler::new(h.cache.clone())
        .execute(InvalidateEventCommand { event_id: event.id })
        .await;

    let (l1, l2) = h.cached(event.id);
    assert_eq!(l1, None);
    assert!(l2.is_some(), "unreachable tier keeps its copy until TTL");
}

#[tokio::test]
async fn test_reservation_then_fresh_read_sees_new_count() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);

    let before = h.cache.resolve(&event.id).await.unwrap().unwrap();
    assert_eq!(before.available_tickets, 5);

    let reserved = ReserveTicketsCommandHandler::new(h.cache.clone())
        .execute(ReserveTicketsCommand {
            event_id: event.id,
            quantity: 3,
        })
        .await
        .unwrap();
    assert_eq!(reserved, TicketsResponse {
        event_id: event.id,
        available_tickets: 2,
    });
    assert_eq!(h.store.peek(&event.id).unwrap().available_tickets, 2);

    // A read taken before the reservation keeps its snapshot.
    assert_eq!(before.available_tickets, 5);
    assert_eq!(h.cached(event.id), (None, None));

    let after = h.cache.resolve(&event.id).await.unwrap().unwrap();
    assert_eq!(after.available_tickets, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reservations_sell_last_ticket_once() {
    let event = event_fixture(Uuid::now_v7(), 1);
    let h = Harness::new(vec![event.clone()]);
    h.cache.resolve(&event.id).await.unwrap();
    let handler = ReserveTicketsCommandHandler::new(h.cache.clone());

    let attempts = (0..16).map(|_| {
        let handler = handler.clone();
        tokio::spawn(async move {
            handler
                .execute(ReserveTicketsCommand {
                    event_id: event.id,
                    quantity: 1,
                })
                .await
        })
    });
    let outcomes: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = outcomes.iter().filter(|o| o.is_ok()).count();
    let exhausted = outcomes
        .iter()
        .filter(|o| matches!(o, Err(EventError::InventoryExhausted { .. })))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(exhausted, 15);
    assert_eq!(h.store.peek(&event.id).unwrap().available_tickets, 0);
}

#[tokio::test]
async fn test_exhausted_reservation_reports_counts() {
    let event = event_fixture(Uuid::now_v7(), 2);
    let h = Harness::new(vec![event.clone()]);

    let err = ReserveTicketsCommandHandler::new(h.cache.clone())
        .execute(ReserveTicketsCommand {
            event_id: event.id,
            quantity: 3,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EventError::InventoryExhausted {
            requested: 3,
            available: 2,
            ..
        }
    ));
    assert_eq!(h.store.peek(&event.id).unwrap().available_tickets, 2);
}

#[tokio::test]
async fn test_quantity_must_be_positive() {
    let event = event_fixture(Uuid::now_v7(), 2);
    let h = Harness::new(vec![event.clone()]);

    for quantity in [0, -1] {
        let err = ReleaseTicketsCommandHandler::new(h.cache.clone())
            .execute(ReleaseTicketsCommand {
                event_id: event.id,
                quantity,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::InvalidQuantity(q) if q == quantity));
    }
    assert_eq!(h.store.writes(), 0);
}

#[tokio::test]
async fn test_release_returns_tickets() {
    let event = event_fixture(Uuid::now_v7(), 2);
    let h = Harness::new(vec![event.clone()]);
    h.cache.resolve(&event.id).await.unwrap();

    let released = ReleaseTicketsCommandHandler::new(h.cache.clone())
        .execute(ReleaseTicketsCommand {
            event_id: event.id,
            quantity: 4,
        })
        .await
        .unwrap();
    assert_eq!(released.available_tickets, 6);

    let read = h.cache.resolve(&event.id).await.unwrap().unwrap();
    assert_eq!(read.available_tickets, 6);
}

#[tokio::test]
async fn test_release_past_integer_range_is_rejected() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    h.cache.resolve(&event.id).await.unwrap();

    let err = ReleaseTicketsCommandHandler::new(h.cache.clone())
        .execute(ReleaseTicketsCommand {
            event_id: event.id,
            quantity: i32::MAX,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, EventError::Validation(_)));
    assert_eq!(h.store.peek(&event.id).unwrap().available_tickets, 5);
    let (l1, _) = h.cached(event.id);
    assert_eq!(l1.map(|e| e.available_tickets), Some(5));
}

#[tokio::test]
async fn test_reserve_on_missing_event_is_not_found() {
    let h = Harness::new(vec![]);

    let err = ReserveTicketsCommandHandler::new(h.cache.clone())
        .execute(ReserveTicketsCommand {
            event_id: Uuid::now_v7(),
            quantity: 1,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EventError::NotFound { .. }));
}
