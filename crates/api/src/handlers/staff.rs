//! Staff workflows: account and dog approval, the daily roster, and
//! check-in/check-out.
//!
//! Every handler requires `staff` or `admin` via [`RequireStaff`].

use axum::extract::{Path, Query, State};
use axum::Json;
use kennel_core::booking::{validate_check_in, AttendanceState};
use kennel_core::error::CoreError;
use kennel_core::types::DbId;
use kennel_db::models::agreement::LegalAgreement;
use kennel_db::models::assessment::AssessmentSchedule;
use kennel_db::models::booking::{Booking, RosterEntry, STATUS_CANCELLED};
use kennel_db::models::contact::ContactMessage;
use kennel_db::models::dog::{Dog, PendingDog};
use kennel_db::models::profile::Profile;
use kennel_db::models::subscription::Subscription;
use kennel_db::repositories::{
    AssessmentRepo, BookingRepo, ContactRepo, DogRepo, LegalAgreementRepo, ProfileRepo,
    SubscriptionRepo,
};
use serde::Serialize;

use super::profile::ensure_profile;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::query::{DateParams, StatusParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Everything staff review before approving a customer.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub profile: Profile,
    pub dogs: Vec<Dog>,
    pub subscription: Option<Subscription>,
    pub legal_agreement: Option<LegalAgreement>,
    pub assessments: Vec<AssessmentSchedule>,
}

/// Map the `?status=` filter of the approval queue. Defaults to `pending`.
fn approval_filter(status: Option<&str>) -> AppResult<bool> {
    match status.unwrap_or("pending") {
        "pending" => Ok(false),
        "approved" => Ok(true),
        other => Err(AppError::BadRequest(format!(
            "Unknown status '{other}'. Expected 'pending' or 'approved'"
        ))),
    }
}

async fn ensure_booking_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Booking> {
    BookingRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))
}

/// GET /api/v1/staff/users?status=pending|approved
pub async fn list_users(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<DataResponse<Vec<Profile>>>> {
    let approved = approval_filter(params.status.as_deref())?;
    let profiles = ProfileRepo::list_customers(&state.pool, approved).await?;
    Ok(Json(DataResponse { data: profiles }))
}

/// GET /api/v1/staff/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserDetail>> {
    let pool = &state.pool;
    let profile = ensure_profile(pool, id).await?;
    Ok(Json(UserDetail {
        profile,
        dogs: DogRepo::list_for_owner(pool, id).await?,
        subscription: SubscriptionRepo::find_active_for_user(pool, id).await?,
        legal_agreement: LegalAgreementRepo::find_for_user(pool, id).await?,
        assessments: AssessmentRepo::list_for_user(pool, id).await?,
    }))
}

/// POST /api/v1/staff/users/{id}/approve
pub async fn approve_user(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<Profile>> {
    if !ProfileRepo::approve(&state.pool, id, staff.user_id).await? {
        // Distinguish a missing profile from one that was already approved.
        ensure_profile(&state.pool, id).await?;
        return Err(AppError::Core(CoreError::Conflict(
            "Account is already approved".into(),
        )));
    }

    tracing::info!(staff_id = staff.user_id, user_id = id, "Account approved");
    Ok(Json(ensure_profile(&state.pool, id).await?))
}

/// GET /api/v1/staff/dogs?status=pending
pub async fn list_dogs(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<DataResponse<Vec<PendingDog>>>> {
    match params.status.as_deref().unwrap_or("pending") {
        "pending" => {}
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown status '{other}'. Expected 'pending'"
            )))
        }
    }
    let dogs = DogRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse { data: dogs }))
}

/// POST /api/v1/staff/dogs/{id}/approve
pub async fn approve_dog(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<Dog>> {
    let Some(dog) = DogRepo::approve(&state.pool, id).await? else {
        return match DogRepo::find_by_id(&state.pool, id).await? {
            Some(_) => Err(AppError::Core(CoreError::Conflict(
                "Dog is already approved".into(),
            ))),
            None => Err(AppError::Core(CoreError::NotFound { entity: "Dog", id })),
        };
    };

    tracing::info!(staff_id = staff.user_id, dog_id = id, "Dog approved");
    Ok(Json(dog))
}

/// GET /api/v1/staff/bookings?date=
///
/// Live bookings for one day (default today).
pub async fn roster(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(params): Query<DateParams>,
) -> AppResult<Json<DataResponse<Vec<RosterEntry>>>> {
    let date = params.date.unwrap_or_else(|| state.config.today());
    let entries = BookingRepo::roster_for_date(&state.pool, date).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/staff/bookings/{id}/check-in
pub async fn check_in(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    let booking = ensure_booking_exists(&state.pool, id).await?;
    if booking.status == STATUS_CANCELLED {
        return Err(AppError::Core(CoreError::Conflict(
            "Booking was cancelled".into(),
        )));
    }
    validate_check_in(
        booking.booking_date,
        state.config.today(),
        AttendanceState::from_flags(booking.checked_in, booking.checked_out),
    )?;

    let updated = BookingRepo::check_in(&state.pool, id, staff.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Already checked in".into())))?;

    tracing::info!(staff_id = staff.user_id, booking_id = id, "Checked in");
    Ok(Json(updated))
}

/// POST /api/v1/staff/bookings/{id}/check-out
pub async fn check_out(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    let booking = ensure_booking_exists(&state.pool, id).await?;
    if booking.status == STATUS_CANCELLED {
        return Err(AppError::Core(CoreError::Conflict(
            "Booking was cancelled".into(),
        )));
    }
    AttendanceState::from_flags(booking.checked_in, booking.checked_out)
        .check_out()
        .map_err(|msg| AppError::Core(CoreError::Conflict(msg)))?;

    let updated = BookingRepo::check_out(&state.pool, id, staff.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Already checked out".into())))?;

    tracing::info!(staff_id = staff.user_id, booking_id = id, "Checked out");
    Ok(Json(updated))
}

/// GET /api/v1/staff/contact-messages
pub async fn list_contact_messages(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
) -> AppResult<Json<DataResponse<Vec<ContactMessage>>>> {
    let messages = ContactRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: messages }))
}
