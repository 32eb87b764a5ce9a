//! Handlers that start hosted checkouts and manage the caller's subscription.
//!
//! Nothing here changes the day balance. Balances move only when the
//! provider confirms payment through the webhook (see [`super::webhook`]).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kennel_billing::{CheckoutMode, CheckoutSessionRequest};
use kennel_core::checkout::{validate_extra_days, CheckoutKind};
use kennel_core::error::CoreError;
use kennel_core::types::DbId;
use kennel_db::models::subscription::Subscription;
use kennel_db::repositories::{SubscriptionRepo, TierRepo};
use serde::{Deserialize, Serialize};

use super::profile::ensure_profile;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /billing/checkout/subscription`.
#[derive(Debug, Deserialize)]
pub struct SubscriptionCheckoutRequest {
    pub tier_id: DbId,
}

/// Request body for `POST /billing/checkout/extra-days`.
#[derive(Debug, Deserialize)]
pub struct ExtraDaysCheckoutRequest {
    pub num_days: i32,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    /// Hosted page to redirect the browser to.
    pub url: String,
}

/// Public billing settings for the browser.
#[derive(Debug, Serialize)]
pub struct BillingConfigResponse {
    pub publishable_key: Option<String>,
    pub currency: String,
    pub extra_day_price_cents: i64,
}

/// GET /api/v1/billing/config
pub async fn billing_config(State(state): State<AppState>) -> Json<BillingConfigResponse> {
    let billing = &state.config.billing;
    Json(BillingConfigResponse {
        publishable_key: billing.publishable_key.clone(),
        currency: billing.currency.clone(),
        extra_day_price_cents: billing.extra_day_price_cents,
    })
}

/// GET /api/v1/me/subscription
///
/// `null` when the caller has no active subscription.
pub async fn get_active_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Option<Subscription>>> {
    let subscription = SubscriptionRepo::find_active_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(subscription))
}

/// GET /api/v1/me/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Subscription>>>> {
    let subscriptions = SubscriptionRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: subscriptions,
    }))
}

/// POST /api/v1/billing/checkout/subscription
pub async fn checkout_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SubscriptionCheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let tier = TierRepo::find_by_id(&state.pool, input.tier_id)
        .await?
        .filter(|t| t.is_active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription tier",
            id: input.tier_id,
        }))?;

    if SubscriptionRepo::find_active_for_user(&state.pool, auth.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "You already have an active subscription".into(),
        )));
    }

    let profile = ensure_profile(&state.pool, auth.user_id).await?;
    let kind = CheckoutKind::Subscription {
        tier_id: tier.id,
        user_id: auth.user_id,
        days: tier.days_included,
    };

    let request = CheckoutSessionRequest {
        mode: CheckoutMode::Subscription,
        product_name: tier.name.clone(),
        description: Some(format!("{} daycare days per month", tier.days_included)),
        unit_amount_cents: tier.price_cents,
        quantity: 1,
        currency: state.config.billing.currency.clone(),
        customer_email: Some(profile.email),
        client_reference_id: Some(auth.user_id.to_string()),
        success_url: redirect_url(&state, "/dashboard?checkout=success"),
        cancel_url: redirect_url(&state, "/pricing?checkout=cancelled"),
        metadata: kind.to_metadata(),
    };

    let session = state.billing.create_checkout_session(request).await?;
    tracing::info!(
        user_id = auth.user_id,
        tier_id = tier.id,
        session_id = %session.id,
        "Subscription checkout started",
    );
    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// POST /api/v1/billing/checkout/extra-days
///
/// Extra days are priced from the active subscription's own per-day price.
pub async fn checkout_extra_days(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ExtraDaysCheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    validate_extra_days(input.num_days)?;

    let subscription = SubscriptionRepo::find_active_for_user(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "An active subscription is required to buy extra days".into(),
            ))
        })?;

    let profile = ensure_profile(&state.pool, auth.user_id).await?;
    let kind = CheckoutKind::ExtraDays {
        user_id: auth.user_id,
        subscription_id: subscription.id,
        num_days: input.num_days,
    };

    let request = CheckoutSessionRequest {
        mode: CheckoutMode::Payment,
        product_name: "Extra daycare day".into(),
        description: None,
        unit_amount_cents: subscription.extra_day_price_cents,
        quantity: i64::from(input.num_days),
        currency: state.config.billing.currency.clone(),
        customer_email: Some(profile.email),
        client_reference_id: Some(auth.user_id.to_string()),
        success_url: redirect_url(&state, "/dashboard?checkout=success"),
        cancel_url: redirect_url(&state, "/dashboard?checkout=cancelled"),
        metadata: kind.to_metadata(),
    };

    let session = state.billing.create_checkout_session(request).await?;
    tracing::info!(
        user_id = auth.user_id,
        subscription_id = subscription.id,
        num_days = input.num_days,
        session_id = %session.id,
        "Extra days checkout started",
    );
    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// POST /api/v1/billing/subscription/cancel
///
/// Cancels with the provider first, then deactivates locally. The provider's
/// `customer.subscription.deleted` webhook later finds nothing left to do.
pub async fn cancel_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<StatusCode> {
    let subscription = SubscriptionRepo::find_active_for_user(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "You have no active subscription".into(),
            ))
        })?;

    if let Some(provider_id) = &subscription.provider_subscription_id {
        state.billing.cancel_subscription(provider_id).await?;
    }
    SubscriptionRepo::deactivate(&state.pool, subscription.id).await?;

    tracing::info!(
        user_id = auth.user_id,
        subscription_id = subscription.id,
        "Subscription cancelled",
    );
    Ok(StatusCode::NO_CONTENT)
}

fn redirect_url(state: &AppState, path: &str) -> String {
    format!("{}{path}", state.config.public_base_url)
}
