//! Repository for the `subscriptions` table.
//!
//! Webhook-driven writes take a `&mut PgConnection` so the caller can run
//! them inside the same transaction that records the event in the
//! processed-events ledger.

use kennel_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::subscription::{CreateSubscription, Subscription};

const COLUMNS: &str = "id, user_id, tier_id, days_included, days_remaining, price_cents, \
    extra_day_price_cents, is_active, provider_customer_id, provider_subscription_id, \
    checkout_session_id, current_period_start, current_period_end, cancelled_at, \
    created_at, updated_at";

/// Provides subscription reads and the day-balance mutations.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// The user's active subscription, if any. At most one exists.
    pub async fn find_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1 AND is_active = true");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Every subscription the user has held, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE id = $1");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace any active subscription for the user with a fresh one whose
    /// balance is the tier's full allowance.
    pub async fn activate(
        conn: &mut PgConnection,
        input: &CreateSubscription,
    ) -> Result<Subscription, sqlx::Error> {
        sqlx::query(
            "UPDATE subscriptions SET is_active = false, cancelled_at = NOW()
             WHERE user_id = $1 AND is_active = true",
        )
        .bind(input.user_id)
        .execute(&mut *conn)
        .await?;

        let query = format!(
            "INSERT INTO subscriptions
                (user_id, tier_id, days_included, days_remaining, price_cents,
                 extra_day_price_cents, provider_customer_id, provider_subscription_id,
                 checkout_session_id, current_period_start, current_period_end)
             VALUES ($1, $2, $3, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(input.user_id)
            .bind(input.tier_id)
            .bind(input.days_included)
            .bind(input.price_cents)
            .bind(input.extra_day_price_cents)
            .bind(&input.provider_customer_id)
            .bind(&input.provider_subscription_id)
            .bind(&input.checkout_session_id)
            .bind(input.current_period_start)
            .bind(input.current_period_end)
            .fetch_one(&mut *conn)
            .await
    }

    /// Add purchased days to a subscription owned by `user_id`.
    ///
    /// Returns the new balance, or `None` when the subscription does not
    /// belong to the user or is no longer active.
    pub async fn credit_days(
        conn: &mut PgConnection,
        id: DbId,
        user_id: DbId,
        days: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE subscriptions SET days_remaining = days_remaining + $3
             WHERE id = $1 AND user_id = $2 AND is_active = true
             RETURNING days_remaining",
        )
        .bind(id)
        .bind(user_id)
        .bind(days)
        .fetch_optional(conn)
        .await
    }

    /// Mark the subscription carrying a provider id as cancelled.
    /// Returns `true` if an active row was updated.
    pub async fn deactivate_by_provider_id(
        conn: &mut PgConnection,
        provider_subscription_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE subscriptions SET is_active = false, cancelled_at = NOW()
             WHERE provider_subscription_id = $1 AND is_active = true",
        )
        .bind(provider_subscription_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Start a new billing period: balance resets to the included days.
    /// Returns the updated row, or `None` if no active row matches.
    pub async fn renew_period(
        conn: &mut PgConnection,
        provider_subscription_id: &str,
        period_start: Timestamp,
        period_end: Timestamp,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET
                days_remaining = days_included,
                current_period_start = $2,
                current_period_end = $3
             WHERE provider_subscription_id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(provider_subscription_id)
            .bind(period_start)
            .bind(period_end)
            .fetch_optional(conn)
            .await
    }

    /// Deactivate a subscription locally (no provider id to cancel against).
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE subscriptions SET is_active = false, cancelled_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
