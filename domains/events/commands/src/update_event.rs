use events_models::UpdateEvent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventCommand {
    pub event_id: Uuid,
    #[serde(flatten)]
    pub changes: UpdateEvent,
}
