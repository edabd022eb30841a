use async_trait::async_trait;
use dao_utils::is_unique_violation;
use database_traits::dao::GenericDao;
use events_errors::EventError;
use events_models::{Location, Venue};
use sql_connection::SqlConnect;
use tokio_postgres::Row;
use tracing::instrument;
use uuid::Uuid;

const VENUE_COLUMNS: &str = "id, name, description, capacity, latitude, \
                             longitude, address, city, state, country, \
                             postal_code, amenities, images";

#[derive(Clone)]
pub struct VenueDao {
    db: SqlConnect,
}

impl VenueDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    fn map_row(row: &Row) -> Venue {
        Venue {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            capacity: row.get("capacity"),
            location: Location {
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
                address: row.get("address"),
                city: row.get("city"),
                state: row.get("state"),
                country: row.get("country"),
                postal_code: row.get("postal_code"),
            },
            amenities: row.get("amenities"),
            images: row.get("images"),
        }
    }
}

#[async_trait]
impl GenericDao for VenueDao {
    type Error = EventError;
    type ID = Uuid;
    type Model = Venue;

    fn id_of(model: &Venue) -> Uuid { model.id }

    #[instrument(skip_all, fields(venue.id = %model.id))]
    async fn insert(&self, model: &Venue) -> Result<Uuid, EventError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "INSERT INTO venues ({VENUE_COLUMNS}) VALUES ($1, $2, $3, \
                 $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING id"
            ))
            .await?;

        let location = &model.location;
        let row = client
            .query_one(
                &stmt,
                &[
                    &model.id,
                    &model.name,
                    &model.description,
                    &model.capacity,
                    &location.latitude,
                    &location.longitude,
                    &location.address,
                    &location.city,
                    &location.state,
                    &location.country,
                    &location.postal_code,
                    &model.amenities,
                    &model.images,
                ],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    EventError::Persistence(format!(
                        "venue {} already exists",
                        model.id
                    ))
                }
                else {
                    EventError::Database(e)
                }
            })?;

        Ok(row.get(0))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Venue>, EventError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1"
            ))
            .await?;

        let row = client.query_opt(&stmt, &[id]).await?;
        Ok(row.as_ref().map(Self::map_row))
    }

    #[instrument(skip_all, fields(venue.id = %model.id))]
    async fn update(&self, model: &Venue) -> Result<(), EventError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(
                "UPDATE venues SET name = $2, description = $3, capacity = \
                 $4, latitude = $5, longitude = $6, address = $7, city = $8, \
                 state = $9, country = $10, postal_code = $11, amenities = \
                 $12, images = $13 WHERE id = $1",
            )
            .await?;

        let location = &model.location;
        let affected = client
            .execute(
                &stmt,
                &[
                    &model.id,
                    &model.name,
                    &model.description,
                    &model.capacity,
                    &location.latitude,
                    &location.longitude,
                    &location.address,
                    &location.city,
                    &location.state,
                    &location.country,
                    &location.postal_code,
                    &model.amenities,
                    &model.images,
                ],
            )
            .await?;

        if affected == 0 {
            return Err(EventError::VenueNotFound { venue_id: model.id });
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &Uuid) -> Result<(), EventError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached("DELETE FROM venues WHERE id = $1")
            .await?;

        if client.execute(&stmt, &[id]).await? == 0 {
            return Err(EventError::VenueNotFound { venue_id: *id });
        }
        Ok(())
    }
}
