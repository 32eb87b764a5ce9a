//! Handlers for the caller's dogs (`/me/dogs`).
//!
//! New dogs start unapproved; staff approve them before they can be booked.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kennel_core::error::CoreError;
use kennel_core::types::DbId;
use kennel_core::validation::{require_non_empty, validate_phone, MAX_SHORT_TEXT};
use kennel_db::models::dog::{CreateDog, Dog, UpdateDog};
use kennel_db::repositories::DogRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a dog owned by `owner_id`. Dogs of other owners read as not found.
pub(crate) async fn ensure_owned_dog(
    pool: &sqlx::PgPool,
    id: DbId,
    owner_id: DbId,
) -> AppResult<Dog> {
    DogRepo::find_owned(pool, id, owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Dog", id }))
}

fn validate_dog_fields(
    name: Option<&str>,
    vet_phone: Option<&str>,
    weight_lbs: Option<f64>,
) -> Result<(), CoreError> {
    if let Some(name) = name {
        require_non_empty("Dog name", name)?;
        if name.trim().chars().count() > MAX_SHORT_TEXT {
            return Err(CoreError::Validation(format!(
                "Dog name must be at most {MAX_SHORT_TEXT} characters"
            )));
        }
    }
    if let Some(phone) = vet_phone.filter(|p| !p.trim().is_empty()) {
        validate_phone(phone)?;
    }
    if weight_lbs.is_some_and(|w| !(w > 0.0)) {
        return Err(CoreError::Validation("Weight must be positive".into()));
    }
    Ok(())
}

/// GET /api/v1/me/dogs
pub async fn list_dogs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Dog>>>> {
    let dogs = DogRepo::list_for_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: dogs }))
}

/// POST /api/v1/me/dogs
pub async fn create_dog(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateDog>,
) -> AppResult<(StatusCode, Json<Dog>)> {
    validate_dog_fields(
        Some(&input.name),
        input.vet_phone.as_deref(),
        input.weight_lbs,
    )?;

    let dog = DogRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(user_id = auth.user_id, dog_id = dog.id, "Dog registered");
    Ok((StatusCode::CREATED, Json(dog)))
}

/// GET /api/v1/me/dogs/{id}
pub async fn get_dog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Dog>> {
    let dog = ensure_owned_dog(&state.pool, id, auth.user_id).await?;
    Ok(Json(dog))
}

/// PUT /api/v1/me/dogs/{id}
pub async fn update_dog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDog>,
) -> AppResult<Json<Dog>> {
    validate_dog_fields(
        input.name.as_deref(),
        input.vet_phone.as_deref(),
        input.weight_lbs,
    )?;

    let dog = DogRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Dog", id }))?;
    Ok(Json(dog))
}

/// DELETE /api/v1/me/dogs/{id}
///
/// Refused while the dog is on an upcoming booking.
pub async fn delete_dog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_owned_dog(&state.pool, id, auth.user_id).await?;

    if DogRepo::has_upcoming_bookings(&state.pool, id, state.config.today()).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "This dog has upcoming bookings. Cancel them before removing the dog".into(),
        )));
    }

    DogRepo::delete(&state.pool, id, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, dog_id = id, "Dog removed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        assert_matches!(
            validate_dog_fields(Some("  "), None, None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn omitted_fields_pass() {
        assert!(validate_dog_fields(None, None, None).is_ok());
        assert!(validate_dog_fields(Some("Biscuit"), Some(""), Some(42.5)).is_ok());
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        assert!(validate_dog_fields(Some("Biscuit"), None, Some(0.0)).is_err());
        assert!(validate_dog_fields(Some("Biscuit"), None, Some(f64::NAN)).is_err());
    }
}
