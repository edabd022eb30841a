use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GetVenueQuery {
    pub venue_id: Uuid,
}
