//! Chip endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::chip::VerifyChipQuery;
use domain::models::{ChipRecord, ChipVerification, RegisterChipRequest};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Register a chip for a pet.
///
/// POST /api/v1/chips
pub async fn register_chip(
    State(state): State<AppState>,
    Json(request): Json<RegisterChipRequest>,
) -> Result<(StatusCode, Json<ChipRecord>), ApiError> {
    request.validate()?;

    let chip = state.service.register_chip(request).await?;

    info!(chip_id = %chip.id, pet_id = %chip.pet_id, "Chip registered via API");

    Ok((StatusCode::CREATED, Json(chip)))
}

/// Check a chip code's format and registration.
///
/// GET /api/v1/chips/verify?code=CHIP-1234-5678-9012
pub async fn verify_chip(
    State(state): State<AppState>,
    Query(query): Query<VerifyChipQuery>,
) -> Json<ChipVerification> {
    Json(state.service.verify_chip_code(&query.code).await)
}

/// Activate a registered chip, replacing the pet's active chip.
///
/// POST /api/v1/chips/:code/activate
pub async fn activate_chip(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ChipRecord>, ApiError> {
    let chip = state.service.activate_chip(&code).await?;
    Ok(Json(chip))
}
