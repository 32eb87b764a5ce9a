//! Unauthenticated endpoints backing the marketing pages.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kennel_core::validation::{require_non_empty, validate_email, validate_phone};
use kennel_db::models::contact::{ContactMessage, CreateContactMessage};
use kennel_db::models::tier::SubscriptionTier;
use kennel_db::repositories::{ContactRepo, TierRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tiers
pub async fn list_tiers(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SubscriptionTier>>>> {
    let tiers = TierRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: tiers }))
}

/// POST /api/v1/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(input): Json<CreateContactMessage>,
) -> AppResult<(StatusCode, Json<ContactMessage>)> {
    require_non_empty("Name", &input.name)?;
    require_non_empty("Email", &input.email)?;
    require_non_empty("Message", &input.message)?;
    validate_email(&input.email)?;
    if let Some(phone) = input.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        validate_phone(phone)?;
    }

    let message = ContactRepo::create(&state.pool, &input).await?;
    tracing::info!(contact_message_id = message.id, "Contact message received");
    Ok((StatusCode::CREATED, Json(message)))
}
