use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Public routes merged directly under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tiers", get(public::list_tiers))
        .route("/contact", post(public::submit_contact))
}
