//! Handlers for the caller's own profile and dashboard summary.

use axum::extract::State;
use axum::Json;
use kennel_core::error::CoreError;
use kennel_core::types::DbId;
use kennel_core::validation::{require_non_empty, validate_phone};
use kennel_db::models::assessment::AssessmentSchedule;
use kennel_db::models::dog::Dog;
use kennel_db::models::profile::{Profile, UpdateProfile};
use kennel_db::models::subscription::Subscription;
use kennel_db::repositories::{
    AssessmentRepo, BookingRepo, DogRepo, LegalAgreementRepo, ProfileRepo, SubscriptionRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Everything the customer dashboard shows on first load.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub profile: Profile,
    pub dogs: Vec<Dog>,
    pub subscription: Option<Subscription>,
    pub upcoming_bookings: i64,
    pub assessments: Vec<AssessmentSchedule>,
    pub legal_agreement_signed: bool,
}

pub(crate) async fn ensure_profile(pool: &sqlx::PgPool, id: DbId) -> AppResult<Profile> {
    ProfileRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id,
        }))
}

/// GET /api/v1/me/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Profile>> {
    let profile = ensure_profile(&state.pool, auth.user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/me/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<Profile>> {
    if let Some(name) = &input.full_name {
        require_non_empty("Full name", name)?;
    }
    for phone in [&input.phone, &input.emergency_contact_phone]
        .into_iter()
        .flatten()
        .filter(|p| !p.trim().is_empty())
    {
        validate_phone(phone)?;
    }

    let profile = ProfileRepo::update(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: auth.user_id,
        }))?;
    Ok(Json(profile))
}

/// GET /api/v1/me/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DashboardResponse>> {
    let pool = &state.pool;
    let profile = ensure_profile(pool, auth.user_id).await?;
    let dogs = DogRepo::list_for_owner(pool, auth.user_id).await?;
    let subscription = SubscriptionRepo::find_active_for_user(pool, auth.user_id).await?;
    let upcoming_bookings =
        BookingRepo::count_upcoming(pool, auth.user_id, state.config.today()).await?;
    let assessments = AssessmentRepo::list_for_user(pool, auth.user_id).await?;
    let legal_agreement_signed = LegalAgreementRepo::find_for_user(pool, auth.user_id)
        .await?
        .is_some();

    Ok(Json(DashboardResponse {
        profile,
        dogs,
        subscription,
        upcoming_bookings,
        assessments,
        legal_agreement_signed,
    }))
}
