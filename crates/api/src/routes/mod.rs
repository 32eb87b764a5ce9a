pub mod admin;
pub mod assessments;
pub mod auth;
pub mod billing;
pub mod health;
pub mod me;
pub mod public;
pub mod staff;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tiers                                           list tiers (public)
/// /contact                                         contact form (public)
///
/// /auth/signup                                     signup (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /billing/config                                  publishable settings (public)
/// /billing/webhook                                 provider webhook (signed)
/// /billing/checkout/subscription                   start subscription checkout
/// /billing/checkout/extra-days                     start extra-days checkout
/// /billing/subscription/cancel                     cancel active subscription
///
/// /assessments/availability                        Friday availability
///
/// /me/profile                                      get, update
/// /me/dashboard                                    dashboard summary
/// /me/dogs                                         list, create
/// /me/dogs/{id}                                    get, update, delete
/// /me/dogs/{id}/medications                        list, create
/// /me/dogs/{id}/assessment-form                    get, submit (write-once)
/// /me/medications/{id}                             update, delete
/// /me/subscription                                 active subscription
/// /me/subscriptions                                subscription history
/// /me/bookings                                     list, create
/// /me/bookings/{id}/cancel                         cancel
/// /me/assessments                                  list, request
/// /me/assessments/{id}/cancel                      cancel
/// /me/legal-agreement                              get, sign (write-once)
///
/// /staff/users                                     approval queue (?status=)
/// /staff/users/{id}                                account review
/// /staff/users/{id}/approve                        approve account
/// /staff/dogs                                      pending dogs
/// /staff/dogs/{id}/approve                         approve dog
/// /staff/dogs/{id}/medications                     medications
/// /staff/dogs/{id}/assessment-form                 assessment form
/// /staff/bookings                                  roster (?date=)
/// /staff/bookings/{id}/check-in                    check in
/// /staff/bookings/{id}/check-out                   check out
/// /staff/assessments                               all requests (?status=)
/// /staff/assessments/{id}/status                   change status
/// /staff/contact-messages                          contact inbox
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                deactivate
/// /admin/users/{id}/role                           change role
/// /admin/users/{id}/reset-password                 reset password
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(public::router())
        .nest("/auth", auth::router())
        .nest("/billing", billing::router())
        .nest("/assessments", assessments::router())
        .nest("/me", me::router())
        .nest("/staff", staff::router())
        .nest("/admin", admin::router())
}
