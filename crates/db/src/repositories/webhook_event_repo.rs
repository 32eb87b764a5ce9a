//! Repository for the `processed_webhook_events` ledger.

use sqlx::{PgConnection, PgPool};

use crate::models::webhook_event::ProcessedWebhookEvent;

pub struct WebhookEventRepo;

impl WebhookEventRepo {
    /// Claim an event for processing.
    ///
    /// Returns `false` when the event id (or its checkout session) was already
    /// recorded. Run inside the transaction that applies the event so the
    /// claim and the mutation commit or roll back together.
    pub async fn record(
        conn: &mut PgConnection,
        event_id: &str,
        event_type: &str,
        checkout_session_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO processed_webhook_events (event_id, event_type, checkout_session_id)
             VALUES ($1, $2, $3)
             ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(event_type)
        .bind(checkout_session_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_event_id(
        pool: &PgPool,
        event_id: &str,
    ) -> Result<Option<ProcessedWebhookEvent>, sqlx::Error> {
        sqlx::query_as::<_, ProcessedWebhookEvent>(
            "SELECT id, event_id, event_type, checkout_session_id, processed_at
             FROM processed_webhook_events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(pool)
        .await
    }
}
