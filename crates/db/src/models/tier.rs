//! Subscription tier model (seeded reference data).

use kennel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubscriptionTier {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub days_included: i32,
    pub price_cents: i64,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
