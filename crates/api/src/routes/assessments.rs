use axum::routing::get;
use axum::Router;

use crate::handlers::assessments;
use crate::state::AppState;

/// Routes mounted at `/assessments`.
pub fn router() -> Router<AppState> {
    Router::new().route("/availability", get(assessments::availability))
}
