use std::{sync::Arc, time::Duration};

use events_cache_keys::{
    EventCache, EventCacheKey, SearchFingerprint, SearchResultsCache,
    SearchResultsCacheKey, VenueCacheKey,
};
use events_errors::EventError;
use events_models::Event;
use events_queries::{
    EventsByCategoryQuery, GetAllEventsQuery, GetEventQuery, GetVenueQuery,
    OngoingEventsQuery, SearchEventsQuery, UpcomingEventsQuery,
};
use events_query_handlers::{
    EventsByCategoryQueryHandler, GetAllEventsQueryHandler,
    GetEventQueryHandler, GetVenueQueryHandler, OngoingEventsQueryHandler,
    SearchEventsQueryHandler, UpcomingEventsQueryHandler,
};
use redis_connection::{
    cache::{EntryStore, TieredBuilder},
    config::{QueryCacheConfig, TieredConfig},
    core::key::CacheKeyFor,
};
use test_utils::{
    Fault, InMemoryEventStore, InMemoryVenueStore, TEST_L1_TTL, TEST_L2_TTL,
    TestTiers, event_fixture, venue_fixture,
};
use uuid::Uuid;

type Store = Arc<InMemoryEventStore>;

const SEARCH_TTL: Duration = Duration::from_secs(120);

struct Harness {
    tiers: TestTiers,
    store: Store,
    events: Arc<EventCache<Store>>,
    results: Arc<SearchResultsCache>,
}

impl Harness {
    fn new(events: Vec<Event>) -> Self {
        let tiers = TestTiers::new();
        let store = Arc::new(InMemoryEventStore::with_events(events));
        let cache = tiers
            .builder()
            .build(store.clone(), EventCacheKey)
            .expect("valid test tiers");
        let config = QueryCacheConfig {
            ttl_secs: SEARCH_TTL.as_secs(),
            timeout_ms: 50,
        };
        let results = SearchResultsCache::new(
            tiers.l2.clone(),
            SearchResultsCacheKey,
            &config,
        );

        Self {
            tiers,
            store,
            events: Arc::new(cache),
            results: Arc::new(results),
        }
    }

    fn get_event(&self) -> GetEventQueryHandler<Store> {
        GetEventQueryHandler::new(self.events.clone())
    }

    fn search(&self) -> SearchEventsQueryHandler<Store> {
        SearchEventsQueryHandler::new(self.events.clone(), self.results.clone())
    }
}

fn music_in(city: &str) -> SearchEventsQuery {
    SearchEventsQuery {
        query: Some("jazz".into()),
        category: Some("music".into()),
        city: Some(city.into()),
        ..SearchEventsQuery::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_read_through_populates_tiers_with_ordered_expiry() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    let query = GetEventQuery { event_id: event.id };

    assert_eq!(h.get_event().execute(query).await.unwrap(), event);
    assert_eq!(h.store.reads(), 1);

    let key = EventCacheKey.key_for(&event.id);
    let l1_expiry = h.tiers.l1.expires_at(&key).expect("filled L1");
    let l2_expiry = h.tiers.l2_store.expires_at(&key).expect("filled L2");
    assert!(l1_expiry <= l2_expiry);

    assert_eq!(h.get_event().execute(query).await.unwrap(), event);
    assert_eq!(h.store.reads(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_expired_l1_is_refilled_from_l2() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    let query = GetEventQuery { event_id: event.id };
    h.get_event().execute(query).await.unwrap();

    tokio::time::advance(TEST_L1_TTL + Duration::from_millis(1)).await;
    h.store.set_reachable(false);

    assert_eq!(h.get_event().execute(query).await.unwrap(), event);
    let key = EventCacheKey.key_for(&event.id);
    assert!(EntryStore::get(&h.tiers.l1, &key).is_some());

    tokio::time::advance(TEST_L2_TTL).await;
    let err = h.get_event().execute(query).await.unwrap_err();
    assert!(matches!(err, EventError::Unavailable));
}

#[tokio::test]
async fn test_missing_event_is_not_found_and_not_cached() {
    let h = Harness::new(vec![]);
    let query = GetEventQuery {
        event_id: Uuid::now_v7(),
    };

    for _ in 0..2 {
        let err = h.get_event().execute(query).await.unwrap_err();
        assert!(matches!(err, EventError::NotFound { .. }));
    }
    assert_eq!(h.store.reads(), 2);
    assert!(h.tiers.l1.is_empty());
}

#[tokio::test]
async fn test_broken_shared_tier_falls_through_to_store() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    h.tiers.l2.set_fault(Fault::Error);

    let query = GetEventQuery { event_id: event.id };
    assert_eq!(h.get_event().execute(query).await.unwrap(), event);
    assert_eq!(h.store.reads(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_hung_shared_tier_times_out_to_store() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    h.tiers.l2.set_fault(Fault::Hang);

    let query = GetEventQuery { event_id: event.id };
    assert_eq!(h.get_event().execute(query).await.unwrap(), event);

    let search = h.search().execute(music_in("Berlin")).await.unwrap();
    assert!(search.is_empty());
}

#[tokio::test]
async fn test_venue_uses_long_lived_tiers() {
    let venue = venue_fixture("Berlin");
    let store = Arc::new(InMemoryVenueStore::with_venues([venue.clone()]));
    let tiers = TestTiers::new();
    let cache = TieredBuilder::new(TieredConfig::long_lived())
        .add_memory(tiers.l1.clone())
        .add_shared(tiers.l2.clone())
        .build(store.clone(), VenueCacheKey)
        .unwrap();
    let handler = GetVenueQueryHandler::new(Arc::new(cache));

    let query = GetVenueQuery { venue_id: venue.id };
    assert_eq!(handler.execute(query).await.unwrap(), venue);
    assert_eq!(handler.execute(query).await.unwrap(), venue);
    assert_eq!(store.reads(), 1);

    let key = VenueCacheKey.key_for(&venue.id);
    let remaining = tiers.l1.expires_at(&key).unwrap() - tokio::time::Instant::now();
    assert!(remaining > Duration::from_secs(5 * 60 * 60));

    let missing = GetVenueQuery {
        venue_id: Uuid::now_v7(),
    };
    assert!(matches!(
        handler.execute(missing).await,
        Err(EventError::VenueNotFound { .. })
    ));
}

#[tokio::test]
async fn test_search_is_served_from_query_cache() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    h.store.set_venue_city(event.venue_id, "Berlin");

    let first = h.search().execute(music_in("Berlin")).await.unwrap();
    assert_eq!(first, vec![event.clone()]);
    assert_eq!(h.store.reads(), 1);

    let second = h.search().execute(music_in("Berlin")).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(h.store.reads(), 1);

    let other_city = h.search().execute(music_in("Munich")).await.unwrap();
    assert!(other_city.is_empty());
    assert_eq!(h.store.reads(), 2);
}

#[tokio::test]
async fn test_parameter_order_maps_to_one_cache_entry() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    h.store.set_venue_city(event.venue_id, "Berlin");
    h.search().execute(music_in("Berlin")).await.unwrap();

    let reordered = SearchFingerprint::from_params([
        ("city", "Berlin"),
        ("category", "music"),
        ("query", "Jazz"),
    ]);
    let key = SearchResultsCacheKey.key_for(&reordered);
    assert!(EntryStore::get(&h.tiers.l2_store, &key).is_some());
    assert!(EntryStore::get(&h.tiers.l1, &key).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_search_results_go_stale_until_ttl() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    h.store.set_venue_city(event.venue_id, "Berlin");
    h.search().execute(music_in("Berlin")).await.unwrap();

    h.store.overwrite(Event {
        title: "Jazz Brunch".into(),
        ..event.clone()
    });
    let stale = h.search().execute(music_in("Berlin")).await.unwrap();
    assert_eq!(stale[0].title, "Jazz Night");

    tokio::time::advance(SEARCH_TTL + Duration::from_secs(1)).await;
    let fresh = h.search().execute(music_in("Berlin")).await.unwrap();
    assert_eq!(fresh[0].title, "Jazz Brunch");
}

#[tokio::test]
async fn test_category_listing_shares_search_entries() {
    let event = event_fixture(Uuid::now_v7(), 5);
    let h = Harness::new(vec![event.clone()]);
    let by_category = EventsByCategoryQueryHandler::new(h.search());

    let category_only = SearchEventsQuery {
        category: Some("music".into()),
        ..SearchEventsQuery::default()
    };
    h.search().execute(category_only).await.unwrap();
    assert_eq!(h.store.reads(), 1);

    let found = by_category
        .execute(EventsByCategoryQuery {
            category: "music".into(),
        })
        .await
        .unwrap();
    assert_eq!(found, vec![event]);
    assert_eq!(h.store.reads(), 1);
}

#[tokio::test]
async fn test_time_relative_listings_always_hit_store() {
    let upcoming = event_fixture(Uuid::now_v7(), 5);
    let mut ongoing = event_fixture(Uuid::now_v7(), 5);
    ongoing.start_time = chrono::Utc::now() - chrono::Duration::hours(1);
    ongoing.end_time = chrono::Utc::now() + chrono::Duration::hours(1);
    let h = Harness::new(vec![upcoming.clone(), ongoing.clone()]);

    let all = GetAllEventsQueryHandler::new(h.events.clone());
    let soon = UpcomingEventsQueryHandler::new(h.events.clone());
    let now = OngoingEventsQueryHandler::new(h.events.clone());

    assert_eq!(all.execute(GetAllEventsQuery).await.unwrap().len(), 2);
    assert_eq!(
        soon.execute(UpcomingEventsQuery::default()).await.unwrap(),
        vec![upcoming]
    );
    assert_eq!(
        now.execute(OngoingEventsQuery::default()).await.unwrap(),
        vec![ongoing]
    );
    assert_eq!(all.execute(GetAllEventsQuery).await.unwrap().len(), 2);
    assert_eq!(h.store.reads(), 4);
    assert!(h.tiers.l2_store.is_empty());
}
