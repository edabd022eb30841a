use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GetEventQuery {
    pub event_id: Uuid,
}
