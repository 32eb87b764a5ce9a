//! Handlers for dog medications.
//!
//! Listings come back split into current (active or upcoming) and
//! historical entries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kennel_core::error::CoreError;
use kennel_core::medication::{partition, validate_range};
use kennel_core::types::DbId;
use kennel_core::validation::require_non_empty;
use kennel_db::models::medication::{CreateMedication, Medication, UpdateMedication};
use kennel_db::repositories::{DogRepo, MedicationRepo};
use serde::Serialize;

use super::dogs::ensure_owned_dog;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MedicationList {
    pub current: Vec<Medication>,
    pub historical: Vec<Medication>,
}

async fn split_for_dog(state: &AppState, dog_id: DbId) -> AppResult<MedicationList> {
    let all = MedicationRepo::list_for_dog(&state.pool, dog_id).await?;
    let (current, historical) =
        partition(all, state.config.today(), |m| (m.start_date, m.end_date));
    Ok(MedicationList {
        current,
        historical,
    })
}

async fn ensure_owned_medication(
    pool: &sqlx::PgPool,
    id: DbId,
    owner_id: DbId,
) -> AppResult<Medication> {
    MedicationRepo::find_owned(pool, id, owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Medication",
            id,
        }))
}

/// GET /api/v1/me/dogs/{dog_id}/medications
pub async fn list_for_dog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(dog_id): Path<DbId>,
) -> AppResult<Json<MedicationList>> {
    ensure_owned_dog(&state.pool, dog_id, auth.user_id).await?;
    Ok(Json(split_for_dog(&state, dog_id).await?))
}

/// POST /api/v1/me/dogs/{dog_id}/medications
pub async fn create_medication(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(dog_id): Path<DbId>,
    Json(input): Json<CreateMedication>,
) -> AppResult<(StatusCode, Json<Medication>)> {
    require_non_empty("Medication name", &input.name)?;
    require_non_empty("Dosage", &input.dosage)?;
    require_non_empty("Frequency", &input.frequency)?;
    validate_range(input.start_date, input.end_date)?;

    ensure_owned_dog(&state.pool, dog_id, auth.user_id).await?;

    let medication = MedicationRepo::create(&state.pool, dog_id, &input).await?;
    Ok((StatusCode::CREATED, Json(medication)))
}

/// PUT /api/v1/me/medications/{id}
///
/// The date range is validated against the merged result of the stored row
/// and the patch.
pub async fn update_medication(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMedication>,
) -> AppResult<Json<Medication>> {
    for (field, value) in [
        ("Medication name", &input.name),
        ("Dosage", &input.dosage),
        ("Frequency", &input.frequency),
    ] {
        if let Some(value) = value {
            require_non_empty(field, value)?;
        }
    }

    let existing = ensure_owned_medication(&state.pool, id, auth.user_id).await?;
    validate_range(
        input.start_date.or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;

    let medication = MedicationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Medication",
            id,
        }))?;
    Ok(Json(medication))
}

/// DELETE /api/v1/me/medications/{id}
pub async fn delete_medication(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_owned_medication(&state.pool, id, auth.user_id).await?;
    MedicationRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/staff/dogs/{dog_id}/medications
pub async fn staff_list_for_dog(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(dog_id): Path<DbId>,
) -> AppResult<Json<MedicationList>> {
    DogRepo::find_by_id(&state.pool, dog_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Dog",
            id: dog_id,
        }))?;
    Ok(Json(split_for_dog(&state, dog_id).await?))
}
