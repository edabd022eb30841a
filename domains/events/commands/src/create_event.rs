use events_models::NewEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventCommand {
    #[serde(flatten)]
    pub event: NewEvent,
}

impl From<NewEvent> for CreateEventCommand {
    fn from(event: NewEvent) -> Self { Self { event } }
}
