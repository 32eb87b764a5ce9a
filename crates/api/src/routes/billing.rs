//! Route definitions for the `/billing` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{billing, webhook};
use crate::state::AppState;

/// Routes mounted at `/billing`.
///
/// ```text
/// GET  /config                 -> billing_config (public)
/// POST /webhook                -> webhook::receive (signature-checked)
/// POST /checkout/subscription  -> checkout_subscription
/// POST /checkout/extra-days    -> checkout_extra_days
/// POST /subscription/cancel    -> cancel_subscription
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/config", get(billing::billing_config))
        .route("/webhook", post(webhook::receive))
        .route("/checkout/subscription", post(billing::checkout_subscription))
        .route("/checkout/extra-days", post(billing::checkout_extra_days))
        .route("/subscription/cancel", post(billing::cancel_subscription))
}
