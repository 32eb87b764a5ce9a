//! Write-once forms: the per-dog assessment questionnaire and the
//! customer's legal agreement.
//!
//! Both are submitted once and then only read back. A second submission
//! hits a unique constraint and comes back as 409.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use kennel_core::error::CoreError;
use kennel_core::types::DbId;
use kennel_core::validation::{require_non_empty, validate_agreement};
use kennel_db::models::agreement::{ClauseAcceptances, CreateLegalAgreement, LegalAgreement};
use kennel_db::models::assessment::{AssessmentForm, CreateAssessmentForm};
use kennel_db::repositories::{AssessmentFormRepo, DogRepo, LegalAgreementRepo};
use serde::Deserialize;

use super::client_ip;
use super::dogs::ensure_owned_dog;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

/// Request body for `POST /me/legal-agreement`.
#[derive(Debug, Deserialize)]
pub struct SignAgreementRequest {
    pub clauses: ClauseAcceptances,
    pub signature: String,
}

fn validate_assessment_form(input: &CreateAssessmentForm) -> Result<(), CoreError> {
    require_non_empty("Signature", &input.signature)?;
    if input.bite_history
        && input
            .bite_history_details
            .as_deref()
            .map_or(true, |d| d.trim().is_empty())
    {
        return Err(CoreError::Validation(
            "Please describe the bite history".into(),
        ));
    }
    Ok(())
}

/// GET /api/v1/me/dogs/{dog_id}/assessment-form
///
/// `null` when the form has not been submitted yet.
pub async fn get_assessment_form(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(dog_id): Path<DbId>,
) -> AppResult<Json<Option<AssessmentForm>>> {
    ensure_owned_dog(&state.pool, dog_id, auth.user_id).await?;
    let form = AssessmentFormRepo::find_for_dog(&state.pool, dog_id).await?;
    Ok(Json(form))
}

/// POST /api/v1/me/dogs/{dog_id}/assessment-form
pub async fn submit_assessment_form(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(dog_id): Path<DbId>,
    Json(input): Json<CreateAssessmentForm>,
) -> AppResult<(StatusCode, Json<AssessmentForm>)> {
    validate_assessment_form(&input)?;
    ensure_owned_dog(&state.pool, dog_id, auth.user_id).await?;

    let form = AssessmentFormRepo::create(&state.pool, dog_id, auth.user_id, &input).await?;
    tracing::info!(user_id = auth.user_id, dog_id, "Assessment form submitted");
    Ok((StatusCode::CREATED, Json(form)))
}

/// GET /api/v1/staff/dogs/{dog_id}/assessment-form
pub async fn staff_get_assessment_form(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(dog_id): Path<DbId>,
) -> AppResult<Json<Option<AssessmentForm>>> {
    DogRepo::find_by_id(&state.pool, dog_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Dog",
            id: dog_id,
        }))?;
    let form = AssessmentFormRepo::find_for_dog(&state.pool, dog_id).await?;
    Ok(Json(form))
}

/// GET /api/v1/me/legal-agreement
pub async fn get_legal_agreement(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Option<LegalAgreement>>> {
    let agreement = LegalAgreementRepo::find_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(agreement))
}

/// POST /api/v1/me/legal-agreement
///
/// Every clause except the photo release must be accepted. The signing
/// address is recorded alongside the signature.
pub async fn sign_legal_agreement(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(input): Json<SignAgreementRequest>,
) -> AppResult<(StatusCode, Json<LegalAgreement>)> {
    validate_agreement(&input.clauses.as_pairs(), &input.signature)?;

    let agreement = LegalAgreementRepo::create(
        &state.pool,
        &CreateLegalAgreement {
            user_id: auth.user_id,
            clauses: input.clauses,
            signature: input.signature.trim().to_string(),
            ip_address: client_ip(&headers),
        },
    )
    .await?;

    tracing::info!(user_id = auth.user_id, "Legal agreement signed");
    Ok((StatusCode::CREATED, Json(agreement)))
}
