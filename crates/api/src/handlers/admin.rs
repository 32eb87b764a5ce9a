//! Handlers for the `/admin` resource (account management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kennel_core::error::CoreError;
use kennel_core::roles::{is_valid_role, ALL_ROLES, ROLE_ADMIN};
use kennel_core::types::DbId;
use kennel_core::validation::{
    normalize_email, require_non_empty, validate_email, validate_password, validate_phone,
};
use kennel_db::models::profile::Profile;
use kennel_db::models::user::{AccountSummary, CreateAccount};
use kennel_db::repositories::{ProfileRepo, SessionRepo, UserRepo};
use serde::Deserialize;

use super::profile::ensure_profile;
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub password: String,
    pub role: String,
}

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

fn validate_role(role: &str) -> Result<(), CoreError> {
    if !is_valid_role(role) {
        return Err(CoreError::Validation(format!(
            "Unknown role '{role}'. Expected one of: {}",
            ALL_ROLES.join(", ")
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<AccountSummary>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/admin/users
///
/// Identity and profile are created together with the requested role.
/// Accounts created by an admin skip the approval queue.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<Profile>)> {
    require_non_empty("Email", &input.email)?;
    require_non_empty("Full name", &input.full_name)?;
    validate_email(&input.email)?;
    validate_password(&input.password)?;
    validate_role(&input.role)?;
    let phone = input
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    if let Some(phone) = &phone {
        validate_phone(phone)?;
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let account = UserRepo::create_account(
        &state.pool,
        &CreateAccount {
            email: normalize_email(&input.email),
            password_hash,
            full_name: input.full_name.trim().to_string(),
            phone,
            role: input.role,
            is_approved: true,
            approved_by: Some(admin.user_id),
        },
    )
    .await?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id = account.profile.id,
        role = %account.profile.role,
        "Account created by admin",
    );
    Ok((StatusCode::CREATED, Json(account.profile)))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Existing access tokens keep the old role until they expire.
pub async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<Profile>> {
    validate_role(&input.role)?;
    if id == admin.user_id && input.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot remove their own admin role".into(),
        )));
    }

    if !ProfileRepo::set_role(&state.pool, id, &input.role).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id,
        }));
    }

    tracing::info!(admin_id = admin.user_id, user_id = id, role = %input.role, "Role changed");
    Ok(Json(ensure_profile(&state.pool, id).await?))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft delete: the account is deactivated and every session revoked.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot deactivate their own account".into(),
        )));
    }

    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(admin_id = admin.user_id, user_id = id, "Account deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Sets a new password and signs the account out everywhere.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password(&input.new_password)?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, id, &hashed).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(admin_id = admin.user_id, user_id = id, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}
