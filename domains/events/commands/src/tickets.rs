use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReserveTicketsCommand {
    pub event_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReleaseTicketsCommand {
    pub event_id: Uuid,
    pub quantity: i32,
}

/// Authoritative ticket count right after the adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketsResponse {
    pub event_id: Uuid,
    pub available_tickets: i32,
}
