use std::sync::Arc;

use anyhow::Context;
use events_cache_keys::{
    EventCacheKey, SearchResultsCache, SearchResultsCacheKey, VenueCacheKey,
};
use events_command_handlers::{
    CreateEventCommandHandler, CreateVenueCommandHandler,
    DeleteEventCommandHandler, InvalidateEventCommandHandler,
    ReleaseTicketsCommandHandler, ReserveTicketsCommandHandler,
    UpdateEventCommandHandler,
};
use events_dao::{EventDao, VenueDao};
use events_query_handlers::{
    EventsByCategoryQueryHandler, GetAllEventsQueryHandler,
    GetEventQueryHandler, GetVenueQueryHandler, OngoingEventsQueryHandler,
    SearchEventsQueryHandler, UpcomingEventsQueryHandler,
};
use redis_connection::{
    cache::{EntryStore, MemoryCache, RedisCache, SharedCache, TieredBuilder},
    config::{
        EntryStoreConfig, QueryCacheConfig, RedisDbConfig, SharedCacheConfig,
        TieredConfig,
    },
    connect_redis_db,
};
use sql_connection::{PostgresDbConfig, connect_postgres_db};
use tracing::info;

use crate::cli::{CacheArgs, ConnectArgs};

pub struct EventServices {
    pub get_event: GetEventQueryHandler<EventDao>,
    pub get_venue: GetVenueQueryHandler<VenueDao>,
    pub search: SearchEventsQueryHandler<EventDao>,
    pub by_category: EventsByCategoryQueryHandler<EventDao>,
    pub all: GetAllEventsQueryHandler<EventDao>,
    pub upcoming: UpcomingEventsQueryHandler<EventDao>,
    pub ongoing: OngoingEventsQueryHandler<EventDao>,
    pub create_event: CreateEventCommandHandler<EventDao>,
    pub update_event: UpdateEventCommandHandler<EventDao>,
    pub delete_event: DeleteEventCommandHandler<EventDao>,
    pub invalidate_event: InvalidateEventCommandHandler<EventDao>,
    pub reserve: ReserveTicketsCommandHandler<EventDao>,
    pub release: ReleaseTicketsCommandHandler<EventDao>,
    pub create_venue: CreateVenueCommandHandler<VenueDao>,
}

fn tiered_config(args: &CacheArgs) -> TieredConfig {
    TieredConfig {
        memory: EntryStoreConfig {
            capacity: args.l1_capacity,
            ttl_secs: args.l1_ttl_secs,
        },
        shared: SharedCacheConfig {
            ttl_secs: args.l2_ttl_secs,
            timeout_ms: args.l2_timeout_ms,
            ..SharedCacheConfig::default()
        },
        store_timeout_ms: args.store_timeout_ms,
        ..TieredConfig::default()
    }
}

impl EventServices {
    pub async fn connect(
        connect: &ConnectArgs, cache: &CacheArgs,
    ) -> anyhow::Result<Self> {
        let config = tiered_config(cache);
        config.validate().context("invalid cache configuration")?;
        let search = QueryCacheConfig {
            ttl_secs: cache.search_ttl_secs,
            timeout_ms: cache.l2_timeout_ms,
        };
        search.validate().context("invalid search cache configuration")?;

        let db = connect_postgres_db(&PostgresDbConfig {
            uri: connect.database_url.clone(),
            max_conn: Some(16),
            min_conn: None,
            logger: false,
            wait_timeout_ms: cache.store_timeout_ms,
        })
        .await
        .context("cannot connect to postgres")?;

        let shared: Arc<dyn SharedCache> = if connect.memory_l2 {
            info!("shared tier: in-process");
            Arc::new(MemoryCache::from_config(&config.shared))
        } else {
            let pool = connect_redis_db(&RedisDbConfig {
                host: connect.redis_host.clone(),
                port: connect.redis_port,
                db: connect.redis_db,
            })
            .context("cannot build redis pool")?;
            Arc::new(RedisCache::from_config(pool, &config.shared))
        };
        let l1 = Arc::new(EntryStore::from_config(&config.memory));

        let events = Arc::new(
            TieredBuilder::new(config.clone())
                .add_memory(l1.clone())
                .add_shared(shared.clone())
                .build(EventDao::new(db.clone()), EventCacheKey)?,
        );
        let venues = Arc::new(
            TieredBuilder::new(TieredConfig {
                memory: EntryStoreConfig {
                    capacity: config.memory.capacity,
                    ..TieredConfig::long_lived().memory
                },
                ..TieredConfig::long_lived()
            })
            .add_memory(l1)
            .add_shared(shared.clone())
            .build(VenueDao::new(db), VenueCacheKey)?,
        );
        let results = Arc::new(SearchResultsCache::new(
            shared,
            SearchResultsCacheKey,
            &search,
        ));

        let search = SearchEventsQueryHandler::new(events.clone(), results);
        Ok(Self {
            get_event: GetEventQueryHandler::new(events.clone()),
            get_venue: GetVenueQueryHandler::new(venues.clone()),
            by_category: EventsByCategoryQueryHandler::new(search.clone()),
            search,
            all: GetAllEventsQueryHandler::new(events.clone()),
            upcoming: UpcomingEventsQueryHandler::new(events.clone()),
            ongoing: OngoingEventsQueryHandler::new(events.clone()),
            create_event: CreateEventCommandHandler::new(events.clone()),
            update_event: UpdateEventCommandHandler::new(events.clone()),
            delete_event: DeleteEventCommandHandler::new(events.clone()),
            invalidate_event: InvalidateEventCommandHandler::new(events.clone()),
            reserve: ReserveTicketsCommandHandler::new(events.clone()),
            release: ReleaseTicketsCommandHandler::new(events),
            create_venue: CreateVenueCommandHandler::new(venues),
        })
    }
}
