//! Processed billing webhook ledger row.

use kennel_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ProcessedWebhookEvent {
    pub id: DbId,
    pub event_id: String,
    pub event_type: String,
    pub checkout_session_id: Option<String>,
    pub processed_at: Timestamp,
}
