//! Billing provider webhook receiver (`POST /billing/webhook`).
//!
//! Deliveries are at-least-once. Each event is claimed in
//! `processed_webhook_events` inside the same transaction that applies it,
//! so a replayed event id, or a second event for an already-applied
//! checkout session, is acknowledged without touching any balance.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Duration, Months, Utc};
use kennel_billing::event::{classify, construct_event};
use kennel_billing::{BillingError, CheckoutCompleted, InvoicePaid, ProviderEvent, SIGNATURE_HEADER};
use kennel_core::checkout::CheckoutKind;
use kennel_core::types::Timestamp;
use kennel_db::models::subscription::CreateSubscription;
use kennel_db::repositories::{ProfileRepo, SubscriptionRepo, TierRepo, WebhookEventRepo};
use serde::Serialize;
use sqlx::PgConnection;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
}

/// POST /api/v1/billing/webhook
///
/// The raw body is verified against the signature header before it is
/// parsed. Events the service does not act on are still recorded and
/// acknowledged so the provider stops retrying them.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| BillingError::Signature("Missing signature header".into()))?;
    let event = construct_event(&body, signature, &state.config.billing.webhook_secret)?;
    let parsed = classify(&event)?;

    let event_id = event.id.to_string();
    let event_type = event.type_.to_string();
    tracing::debug!(%event_id, %event_type, created = event.created, "Webhook received");

    // A session is claimed only once it is paid. An unpaid completion leaves
    // it free for the async-payment event that settles it.
    let session_id = match &parsed {
        ProviderEvent::CheckoutCompleted(c) | ProviderEvent::CheckoutPaymentSucceeded(c)
            if c.paid =>
        {
            Some(c.session_id.as_str())
        }
        _ => None,
    };

    let mut tx = state.pool.begin().await?;

    if !WebhookEventRepo::record(&mut *tx, &event_id, &event_type, session_id).await? {
        tx.rollback().await?;
        tracing::info!(
            %event_id,
            %event_type,
            created = event.created,
            "Duplicate webhook delivery acknowledged",
        );
        return Ok(Json(WebhookAck {
            received: true,
            duplicate: true,
        }));
    }

    match parsed {
        ProviderEvent::CheckoutCompleted(checkout)
        | ProviderEvent::CheckoutPaymentSucceeded(checkout) => {
            if checkout.paid {
                apply_checkout(&mut *tx, &state, &event_id, checkout).await?;
            } else {
                tracing::info!(
                    %event_id,
                    session_id = %checkout.session_id,
                    "Checkout completed before payment settled",
                );
            }
        }
        ProviderEvent::SubscriptionDeleted { subscription_id } => {
            let updated =
                SubscriptionRepo::deactivate_by_provider_id(&mut *tx, &subscription_id).await?;
            tracing::info!(
                %event_id,
                provider_subscription_id = %subscription_id,
                updated,
                "Subscription ended by provider",
            );
        }
        ProviderEvent::InvoicePaid(invoice) => {
            apply_invoice(&mut *tx, &event_id, invoice).await?;
        }
        ProviderEvent::Ignored { event_type } => {
            tracing::debug!(%event_id, %event_type, "Webhook event ignored");
        }
    }

    tx.commit().await?;
    Ok(Json(WebhookAck {
        received: true,
        duplicate: false,
    }))
}

/// Create or top up a subscription from a paid checkout.
///
/// Checkouts that can never be applied (undecodable metadata, a tier or
/// customer that no longer exists) are logged and acknowledged: retrying the
/// same payload would never succeed.
async fn apply_checkout(
    conn: &mut PgConnection,
    state: &AppState,
    event_id: &str,
    checkout: CheckoutCompleted,
) -> AppResult<()> {
    let kind = match CheckoutKind::from_metadata(&checkout.metadata) {
        Ok(kind) => kind,
        Err(e) => {
            tracing::warn!(
                event_id,
                session_id = %checkout.session_id,
                error = %e,
                "Checkout completed with unusable metadata",
            );
            return Ok(());
        }
    };

    match kind {
        CheckoutKind::Subscription {
            tier_id,
            user_id,
            days,
        } => {
            let Some(tier) = TierRepo::find_by_id(&mut *conn, tier_id).await? else {
                tracing::warn!(
                    event_id,
                    session_id = %checkout.session_id,
                    tier_id,
                    "Paid checkout references an unknown tier",
                );
                return Ok(());
            };
            if !ProfileRepo::exists(&mut *conn, user_id).await? {
                tracing::warn!(
                    event_id,
                    session_id = %checkout.session_id,
                    user_id,
                    "Paid checkout references an unknown customer",
                );
                return Ok(());
            }

            let now = Utc::now();
            let subscription = SubscriptionRepo::activate(
                conn,
                &CreateSubscription {
                    user_id,
                    tier_id,
                    days_included: days,
                    price_cents: tier.price_cents,
                    extra_day_price_cents: state.config.billing.extra_day_price_cents,
                    provider_customer_id: checkout.customer_id,
                    provider_subscription_id: checkout.subscription_id,
                    checkout_session_id: Some(checkout.session_id),
                    current_period_start: now,
                    current_period_end: one_month_after(now),
                },
            )
            .await?;

            tracing::info!(
                event_id,
                user_id,
                subscription_id = subscription.id,
                days,
                "Subscription activated",
            );
        }
        CheckoutKind::ExtraDays {
            user_id,
            subscription_id,
            num_days,
        } => {
            match SubscriptionRepo::credit_days(conn, subscription_id, user_id, num_days).await? {
                Some(days_remaining) => tracing::info!(
                    event_id,
                    user_id,
                    subscription_id,
                    num_days,
                    days_remaining,
                    "Extra days credited",
                ),
                None => tracing::warn!(
                    event_id,
                    user_id,
                    subscription_id,
                    num_days,
                    "Paid extra days for a subscription that is gone or not the payer's",
                ),
            }
        }
    }
    Ok(())
}

/// Renewal invoices reset the balance and roll the billing period.
async fn apply_invoice(
    conn: &mut PgConnection,
    event_id: &str,
    invoice: InvoicePaid,
) -> AppResult<()> {
    if !invoice.is_renewal() {
        tracing::debug!(
            event_id,
            billing_reason = ?invoice.billing_reason,
            "Invoice paid outside a renewal",
        );
        return Ok(());
    }

    let start = invoice
        .period_start
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now);
    let end = invoice
        .period_end
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(|| one_month_after(start));

    match SubscriptionRepo::renew_period(conn, &invoice.subscription_id, start, end).await? {
        Some(subscription) => tracing::info!(
            event_id,
            subscription_id = subscription.id,
            days_remaining = subscription.days_remaining,
            "Subscription renewed",
        ),
        None => tracing::warn!(
            event_id,
            provider_subscription_id = %invoice.subscription_id,
            "Renewal for an unknown or inactive subscription",
        ),
    }
    Ok(())
}

fn one_month_after(start: Timestamp) -> Timestamp {
    start
        .checked_add_months(Months::new(1))
        .unwrap_or(start + Duration::days(30))
}
