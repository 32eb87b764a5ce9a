//! Handlers for the caller's daycare bookings (`/me/bookings`).
//!
//! Each distinct date costs one subscription day, whatever the number of
//! dogs or the session length. The balance debit and the inserts commit
//! together in [`BookingRepo::create_with_debit`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kennel_core::booking::{
    check_day_balance, days_required, is_refundable_cancellation, validate_booking_request,
    validate_session, AttendanceState, SessionTime, SessionType,
};
use kennel_core::error::CoreError;
use kennel_core::types::{Date, DbId};
use kennel_db::models::booking::{Booking, BookingOutcome, CreateBookings, STATUS_CANCELLED};
use kennel_db::repositories::{BookingRepo, DogRepo, SubscriptionRepo};
use serde::{Deserialize, Serialize};

use super::profile::ensure_profile;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /me/bookings`.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub dog_ids: Vec<DbId>,
    pub dates: Vec<Date>,
    pub session_type: SessionType,
    pub session_time: Option<SessionTime>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    pub bookings: Vec<Booking>,
    pub days_used: i32,
    pub days_remaining: i32,
}

#[derive(Debug, Serialize)]
pub struct CancelBookingResponse {
    pub booking: Booking,
    /// Whether the day went back to the subscription.
    pub day_refunded: bool,
}

/// GET /api/v1/me/bookings?from=
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let bookings = BookingRepo::list_for_user(&state.pool, auth.user_id, params.from).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// POST /api/v1/me/bookings
///
/// Checks run cheapest first; the day balance is checked against the
/// current subscription before any write, and again atomically by the
/// conditional debit.
pub async fn create_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<CreateBookingResponse>)> {
    validate_session(input.session_type, input.session_time)?;
    validate_booking_request(&input.dates, &input.dog_ids, state.config.today())?;

    let profile = ensure_profile(&state.pool, auth.user_id).await?;
    if !profile.is_approved {
        return Err(AppError::Core(CoreError::Forbidden(
            "Your account is awaiting approval. Bookings open once staff approve it".into(),
        )));
    }

    let dogs = DogRepo::find_many_owned(&state.pool, &input.dog_ids, auth.user_id).await?;
    if dogs.len() != input.dog_ids.len() {
        return Err(AppError::Core(CoreError::Validation(
            "One or more selected dogs were not found".into(),
        )));
    }
    if let Some(dog) = dogs.iter().find(|d| !d.is_approved) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{} has not been approved for daycare yet",
            dog.name
        ))));
    }

    let subscription = SubscriptionRepo::find_active_for_user(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "An active subscription is required to book daycare".into(),
            ))
        })?;

    let required = days_required(&input.dates);
    check_day_balance(required, subscription.days_remaining)?;

    let outcome = BookingRepo::create_with_debit(
        &state.pool,
        &CreateBookings {
            user_id: auth.user_id,
            subscription_id: subscription.id,
            dog_ids: input.dog_ids,
            dates: input.dates,
            session_type: input.session_type.as_str().to_string(),
            session_time: input.session_time.map(|t| t.as_str().to_string()),
            notes: input.notes.filter(|n| !n.trim().is_empty()),
            days: required,
            daily_capacity: state.config.daily_capacity,
        },
    )
    .await?;

    match outcome {
        BookingOutcome::Created {
            bookings,
            days_remaining,
        } => {
            tracing::info!(
                user_id = auth.user_id,
                subscription_id = subscription.id,
                days_used = required,
                days_remaining,
                "Bookings created",
            );
            Ok((
                StatusCode::CREATED,
                Json(CreateBookingResponse {
                    bookings,
                    days_used: required,
                    days_remaining,
                }),
            ))
        }
        // The balance moved between the read above and the debit.
        BookingOutcome::InsufficientDays => Err(AppError::Core(CoreError::Conflict(
            "Not enough days remaining on your subscription".into(),
        ))),
        BookingOutcome::DateFull(date) => Err(AppError::Core(CoreError::Conflict(format!(
            "{date} is fully booked"
        )))),
    }
}

/// POST /api/v1/me/bookings/{id}/cancel
///
/// Cancelling a future booking nobody has checked in for returns the day.
/// Same-day cancellations keep the booking's day spent.
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CancelBookingResponse>> {
    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|b| b.user_id == auth.user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;

    if booking.status == STATUS_CANCELLED {
        return Err(AppError::Core(CoreError::Conflict(
            "Booking is already cancelled".into(),
        )));
    }
    let attendance = AttendanceState::from_flags(booking.checked_in, booking.checked_out);
    if attendance != AttendanceState::Booked {
        return Err(AppError::Core(CoreError::Conflict(
            "A booking cannot be cancelled after check-in".into(),
        )));
    }

    let refund =
        is_refundable_cancellation(booking.booking_date, state.config.today(), attendance);
    let (booking, day_refunded) = BookingRepo::cancel(&state.pool, id, auth.user_id, refund)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Booking can no longer be cancelled".into(),
            ))
        })?;

    tracing::info!(user_id = auth.user_id, booking_id = id, day_refunded, "Booking cancelled");
    Ok(Json(CancelBookingResponse {
        booking,
        day_refunded,
    }))
}
