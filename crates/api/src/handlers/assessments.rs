//! Handlers for Friday temperament assessments.
//!
//! A Friday belongs to one customer at a time, who may schedule several of
//! their dogs on it. The availability listing is advisory; the exclusion
//! constraint on open requests decides races.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Duration;
use kennel_core::assessment::{
    availability as mark_availability, fridays_between, validate_requested_date,
    validate_transition, FridaySlot,
};
use kennel_core::error::CoreError;
use kennel_core::types::{Date, DbId};
use kennel_db::models::assessment::{
    AssessmentListing, AssessmentSchedule, CreateAssessmentSchedule,
};
use kennel_db::repositories::AssessmentRepo;
use serde::Deserialize;

use super::dogs::ensure_owned_dog;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::query::{DateRangeParams, StatusParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default availability window when `to` is omitted.
const DEFAULT_WINDOW_WEEKS: i64 = 8;

/// Request body for `POST /me/assessments`.
#[derive(Debug, Deserialize)]
pub struct CreateAssessmentRequest {
    pub dog_id: DbId,
    pub requested_date: Date,
    pub notes: Option<String>,
}

/// Request body for `PUT /staff/assessments/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

async fn ensure_assessment_exists(
    pool: &sqlx::PgPool,
    id: DbId,
) -> AppResult<AssessmentSchedule> {
    AssessmentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assessment",
            id,
        }))
}

/// GET /api/v1/assessments/availability?from=&to=
pub async fn availability(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<FridaySlot>>>> {
    let earliest = state.config.today() + Duration::days(1);
    let from = params.from.unwrap_or(earliest).max(earliest);
    let to = params
        .to
        .unwrap_or(from + Duration::weeks(DEFAULT_WINDOW_WEEKS));
    if to < from {
        return Err(AppError::BadRequest(
            "'to' must not be before 'from'".into(),
        ));
    }

    let fridays = fridays_between(from, to);
    let Some(last) = fridays.last().copied() else {
        return Ok(Json(DataResponse { data: Vec::new() }));
    };

    let held: HashMap<Date, DbId> = AssessmentRepo::held_dates(&state.pool, from, last)
        .await?
        .into_iter()
        .collect();

    Ok(Json(DataResponse {
        data: mark_availability(&fridays, &held, auth.user_id),
    }))
}

/// GET /api/v1/me/assessments
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<AssessmentSchedule>>>> {
    let items = AssessmentRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/me/assessments
pub async fn create_assessment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateAssessmentRequest>,
) -> AppResult<(StatusCode, Json<AssessmentSchedule>)> {
    validate_requested_date(input.requested_date, state.config.today())?;
    ensure_owned_dog(&state.pool, input.dog_id, auth.user_id).await?;

    if AssessmentRepo::has_open_for_dog(&state.pool, input.dog_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "This dog already has an assessment scheduled".into(),
        )));
    }

    let schedule = AssessmentRepo::create(
        &state.pool,
        &CreateAssessmentSchedule {
            user_id: auth.user_id,
            dog_id: input.dog_id,
            requested_date: input.requested_date,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        assessment_id = schedule.id,
        date = %schedule.requested_date,
        "Assessment requested",
    );
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// POST /api/v1/me/assessments/{id}/cancel
pub async fn cancel_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<AssessmentSchedule>> {
    if let Some(cancelled) = AssessmentRepo::cancel_for_user(&state.pool, id, auth.user_id).await? {
        return Ok(Json(cancelled));
    }

    let existing = ensure_assessment_exists(&state.pool, id).await?;
    if existing.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Assessment",
            id,
        }));
    }
    Err(AppError::Core(CoreError::Conflict(format!(
        "An assessment that is {} cannot be cancelled",
        existing.status
    ))))
}

/// GET /api/v1/staff/assessments?status=
pub async fn list_all(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<DataResponse<Vec<AssessmentListing>>>> {
    let items = AssessmentRepo::list_all(&state.pool, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: items }))
}

/// PUT /api/v1/staff/assessments/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<AssessmentSchedule>> {
    let existing = ensure_assessment_exists(&state.pool, id).await?;
    validate_transition(&existing.status, &input.status)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let updated = AssessmentRepo::transition(&state.pool, id, &existing.status, &input.status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Assessment was updated by someone else. Reload and try again".into(),
            ))
        })?;

    tracing::info!(
        staff_id = staff.user_id,
        assessment_id = id,
        from = %existing.status,
        to = %updated.status,
        "Assessment status changed",
    );
    Ok(Json(updated))
}
