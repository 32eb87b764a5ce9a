//! Repository for the `subscription_tiers` table.

use kennel_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::tier::SubscriptionTier;

const COLUMNS: &str =
    "id, name, description, days_included, price_cents, is_active, sort_order, created_at, updated_at";

/// Read access to the seeded subscription tiers.
pub struct TierRepo;

impl TierRepo {
    /// Tiers offered for purchase, in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<SubscriptionTier>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscription_tiers WHERE is_active = true ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, SubscriptionTier>(&query)
            .fetch_all(pool)
            .await
    }

    /// Works against the pool or an open transaction.
    pub async fn find_by_id<'c, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<SubscriptionTier>, sqlx::Error>
    where
        E: PgExecutor<'c>,
    {
        let query = format!("SELECT {COLUMNS} FROM subscription_tiers WHERE id = $1");
        sqlx::query_as::<_, SubscriptionTier>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
