//! Subscription model and DTOs.

use kennel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub user_id: DbId,
    pub tier_id: DbId,
    pub days_included: i32,
    /// Decremented by bookings, incremented by extra-day purchases and refunds.
    pub days_remaining: i32,
    pub price_cents: i64,
    pub extra_day_price_cents: i64,
    pub is_active: bool,
    pub provider_customer_id: Option<String>,
    pub provider_subscription_id: Option<String>,
    pub checkout_session_id: Option<String>,
    pub current_period_start: Option<Timestamp>,
    pub current_period_end: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Subscription activated by a completed checkout.
#[derive(Debug)]
pub struct CreateSubscription {
    pub user_id: DbId,
    pub tier_id: DbId,
    pub days_included: i32,
    pub price_cents: i64,
    pub extra_day_price_cents: i64,
    pub provider_customer_id: Option<String>,
    pub provider_subscription_id: Option<String>,
    pub checkout_session_id: Option<String>,
    pub current_period_start: Timestamp,
    pub current_period_end: Timestamp,
}
