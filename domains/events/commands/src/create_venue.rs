use events_models::NewVenue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVenueCommand {
    #[serde(flatten)]
    pub venue: NewVenue,
}
