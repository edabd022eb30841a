use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Drops cached copies of an event after it was changed outside the
/// command handlers, e.g. by a bulk SQL fix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InvalidateEventCommand {
    pub event_id: Uuid,
}
