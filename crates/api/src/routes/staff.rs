//! Route definitions for the `/staff` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{assessments, forms, medications, staff};
use crate::state::AppState;

/// Routes mounted at `/staff`.
///
/// All routes require `staff` or `admin` (enforced by handler extractors).
///
/// ```text
/// GET  /users                      -> list_users (?status=pending|approved)
/// GET  /users/{id}                 -> get_user
/// POST /users/{id}/approve         -> approve_user
/// GET  /dogs                       -> list_dogs (?status=pending)
/// POST /dogs/{id}/approve          -> approve_dog
/// GET  /dogs/{id}/medications      -> staff_list_for_dog
/// GET  /dogs/{id}/assessment-form  -> staff_get_assessment_form
/// GET  /bookings                   -> roster (?date=)
/// POST /bookings/{id}/check-in     -> check_in
/// POST /bookings/{id}/check-out    -> check_out
/// GET  /assessments                -> list_all (?status=)
/// PUT  /assessments/{id}/status    -> update_status
/// GET  /contact-messages           -> list_contact_messages
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(staff::list_users))
        .route("/users/{id}", get(staff::get_user))
        .route("/users/{id}/approve", post(staff::approve_user))
        .route("/dogs", get(staff::list_dogs))
        .route("/dogs/{id}/approve", post(staff::approve_dog))
        .route("/dogs/{id}/medications", get(medications::staff_list_for_dog))
        .route(
            "/dogs/{id}/assessment-form",
            get(forms::staff_get_assessment_form),
        )
        .route("/bookings", get(staff::roster))
        .route("/bookings/{id}/check-in", post(staff::check_in))
        .route("/bookings/{id}/check-out", post(staff::check_out))
        .route("/assessments", get(assessments::list_all))
        .route("/assessments/{id}/status", put(assessments::update_status))
        .route("/contact-messages", get(staff::list_contact_messages))
}
