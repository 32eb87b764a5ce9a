//! Route definitions for the caller's own resources (`/me`).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{assessments, billing, bookings, dogs, forms, medications, profile};
use crate::state::AppState;

/// Routes mounted at `/me`. Every route requires authentication
/// (enforced by the `AuthUser` extractor in each handler).
///
/// ```text
/// GET, PUT         /profile
/// GET              /dashboard
/// GET, POST        /dogs
/// GET, PUT, DELETE /dogs/{id}
/// GET, POST        /dogs/{id}/medications
/// GET, POST        /dogs/{id}/assessment-form
/// PUT, DELETE      /medications/{id}
/// GET              /subscription
/// GET              /subscriptions
/// GET, POST        /bookings
/// POST             /bookings/{id}/cancel
/// GET, POST        /assessments
/// POST             /assessments/{id}/cancel
/// GET, POST        /legal-agreement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/dashboard", get(profile::dashboard))
        .route("/dogs", get(dogs::list_dogs).post(dogs::create_dog))
        .route(
            "/dogs/{id}",
            get(dogs::get_dog)
                .put(dogs::update_dog)
                .delete(dogs::delete_dog),
        )
        .route(
            "/dogs/{id}/medications",
            get(medications::list_for_dog).post(medications::create_medication),
        )
        .route(
            "/dogs/{id}/assessment-form",
            get(forms::get_assessment_form).post(forms::submit_assessment_form),
        )
        .route(
            "/medications/{id}",
            put(medications::update_medication).delete(medications::delete_medication),
        )
        .route("/subscription", get(billing::get_active_subscription))
        .route("/subscriptions", get(billing::list_subscriptions))
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_bookings),
        )
        .route("/bookings/{id}/cancel", post(bookings::cancel_booking))
        .route(
            "/assessments",
            get(assessments::list_mine).post(assessments::create_assessment),
        )
        .route("/assessments/{id}/cancel", post(assessments::cancel_mine))
        .route(
            "/legal-agreement",
            get(forms::get_legal_agreement).post(forms::sign_legal_agreement),
        )
}
