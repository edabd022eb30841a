use async_trait::async_trait;
use dao_utils::{
    FilterBuilder, escape_like, is_check_violation, is_foreign_key_violation,
    is_out_of_range, is_unique_violation,
};
use database_traits::dao::{FilterDao, GenericDao, InventoryDao};
use events_errors::EventError;
use events_models::{Event, EventFilters};
use sql_connection::{PgError, SqlConnect};
use tokio_postgres::Row;
use tracing::{debug, instrument};
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, title, description, category, start_time, \
                             end_time, venue_id, price, available_tickets";

#[derive(Clone)]
pub struct EventDao {
    db: SqlConnect,
}

impl EventDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    pub fn db(&self) -> &SqlConnect { &self.db }

    fn map_row(row: &Row) -> Event {
        Event {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            category: row.get("category"),
            start_time: row.get("start_time"),
            end_time: row.get("end_time"),
            venue_id: row.get("venue_id"),
            price: row.get("price"),
            available_tickets: row.get("available_tickets"),
        }
    }

    fn classify_write(err: PgError, event: &Event) -> EventError {
        if is_unique_violation(&err) {
            EventError::Persistence(format!("event {} already exists", event.id))
        }
        else if is_foreign_key_violation(&err) {
            EventError::VenueNotFound {
                venue_id: event.venue_id,
            }
        }
        else if is_check_violation(&err) {
            EventError::Validation(err.to_string())
        }
        else {
            EventError::Database(err)
        }
    }
}

#[async_trait]
impl GenericDao for EventDao {
    type Error = EventError;
    type ID = Uuid;
    type Model = Event;

    fn id_of(model: &Event) -> Uuid { model.id }

    #[instrument(skip_all, fields(event.id = %model.id))]
    async fn insert(&self, model: &Event) -> Result<Uuid, EventError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "INSERT INTO events ({EVENT_COLUMNS}) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id"
            ))
            .await?;

        let row = client
            .query_one(
                &stmt,
                &[
                    &model.id,
                    &model.title,
                    &model.description,
                    &model.category,
                    &model.start_time,
                    &model.end_time,
                    &model.venue_id,
                    &model.price,
                    &model.available_tickets,
                ],
            )
            .await
            .map_err(|e| Self::classify_write(e, model))?;

        Ok(row.get(0))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Event>, EventError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
            ))
            .await?;

        let row = client.query_opt(&stmt, &[id]).await?;
        Ok(row.as_ref().map(Self::map_row))
    }

    /// Writes every column except `available_tickets`, which only moves
    /// through [`InventoryDao::update_ticket_count`].
    #[instrument(skip_all, fields(event.id = %model.id))]
    async fn update(&self, model: &Event) -> Result<(), EventError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(
                "UPDATE events SET title = $2, description = $3, category = \
                 $4, start_time = $5, end_time = $6, venue_id = $7, price = \
                 $8 WHERE id = $1",
            )
            .await?;

        let affected = client
            .execute(
                &stmt,
                &[
                    &model.id,
                    &model.title,
                    &model.description,
                    &model.category,
                    &model.start_time,
                    &model.end_time,
                    &model.venue_id,
                    &model.price,
                ],
            )
            .await
            .map_err(|e| Self::classify_write(e, model))?;

        if affected == 0 {
            return Err(EventError::NotFound { event_id: model.id });
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &Uuid) -> Result<(), EventError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached("DELETE FROM events WHERE id = $1")
            .await?;

        if client.execute(&stmt, &[id]).await? == 0 {
            return Err(EventError::NotFound { event_id: *id });
        }
        Ok(())
    }
}

#[async_trait]
impl FilterDao for EventDao {
    type Filters = EventFilters;

    #[instrument(skip(self))]
    async fn find_by_filters(
        &self, filters: &EventFilters,
    ) -> Result<Vec<Event>, EventError> {
        let mut builder = FilterBuilder::new();
        builder
            .push_opt(
                "(title ILIKE {} OR description ILIKE {})",
                filters.text.as_deref().map(|t| format!("%{}%", escape_like(t))),
            )
            .push_opt("category = {}", filters.category.clone())
            .push_opt(
                "venue_id IN (SELECT id FROM venues WHERE city = {})",
                filters.city.clone(),
            )
            .push_opt("start_time >= {}", filters.starts_after)
            .push_opt("end_time <= {}", filters.ends_before)
            .push_opt("start_time <= {} AND end_time >= {}", filters.active_at);

        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events{} ORDER BY start_time, id",
            builder.where_clause()
        );
        debug!(%sql, params = builder.len(), "filtered event query");

        let client = self.db.get_client().await?;
        let stmt = client.prepare_cached(&sql).await?;
        let rows = client.query(&stmt, &builder.params()).await?;

        Ok(rows.iter().map(Self::map_row).collect())
    }
}

#[async_trait]
impl InventoryDao for EventDao {
    /// One conditional statement, so concurrent adjustments can never take
    /// the count below zero.
    #[instrument(skip(self))]
    async fn update_ticket_count(
        &self, id: &Uuid, delta: i32,
    ) -> Result<i32, EventError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(
                "UPDATE events SET available_tickets = available_tickets + \
                 $2 WHERE id = $1 AND available_tickets + $2 >= 0 RETURNING \
                 available_tickets",
            )
            .await?;

        let adjusted = client.query_opt(&stmt, &[id, &delta]).await.map_err(|e| {
            if is_out_of_range(&e) {
                EventError::Validation(format!(
                    "ticket count of event {id} out of range"
                ))
            }
            else {
                EventError::Database(e)
            }
        })?;
        if let Some(row) = adjusted {
            return Ok(row.get(0));
        }

        // Nothing matched: either the event is gone or it is short.
        let lookup = client
            .prepare_cached("SELECT available_tickets FROM events WHERE id = $1")
            .await?;
        match client.query_opt(&lookup, &[id]).await? {
            None => Err(EventError::NotFound { event_id: *id }),
            Some(row) => {
                Err(EventError::InventoryExhausted {
                    event_id: *id,
                    requested: delta.saturating_neg(),
                    available: row.get(0),
                })
            }
        }
    }
}
