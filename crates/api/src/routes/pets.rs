//! Pet location and status endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::location::{PetLocationsResponse, ReportFixRequest};
use domain::models::{Alert, ChipStatus, PetLocation};
use domain::services::{FixDisposition, IngestOutcome};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_fixes_ingested;

/// Result of ingesting a fix.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub location: PetLocation,
    pub alerts: Vec<Alert>,
}

impl From<IngestOutcome> for IngestResponse {
    fn from(outcome: IngestOutcome) -> Self {
        Self {
            location: outcome.location,
            alerts: outcome.alerts,
        }
    }
}

/// Acknowledgement for a buffered device fix.
#[derive(Debug, Serialize)]
pub struct BufferedResponse {
    pub status: &'static str,
}

/// Latest location of every pet with an active chip.
///
/// GET /api/v1/pets/locations
pub async fn list_locations(State(state): State<AppState>) -> Json<PetLocationsResponse> {
    let pets = state.service.pets_with_location().await;
    let total = pets.len();
    Json(PetLocationsResponse { pets, total })
}

/// Derived status of a pet's chip.
///
/// GET /api/v1/pets/:pet_id/status
pub async fn get_status(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
) -> Result<Json<ChipStatus>, ApiError> {
    state
        .service
        .chip_status(&pet_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Pet {} has no chip", pet_id)))
}

/// Pull a fix from the configured location source right now.
///
/// POST /api/v1/pets/:pet_id/simulate
pub async fn simulate(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
) -> Result<Json<IngestResponse>, ApiError> {
    let outcome = state.service.simulate(&pet_id).await?;
    record_fixes_ingested(state.service.source_name(), 1);
    Ok(Json(outcome.into()))
}

/// Report a fix captured by a device.
///
/// POST /api/v1/pets/:pet_id/fixes
///
/// Returns 202 when the fix is buffered for the next tick, 201 with the
/// ingestion result when it was recorded immediately.
pub async fn report_fix(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
    Json(request): Json<ReportFixRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let now = state.service.now();
    if let Some(timestamp) = &request.timestamp {
        shared::validation::validate_fix_timestamp(timestamp, now).map_err(|e| {
            ApiError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid timestamp".to_string()),
            )
        })?;
    }

    let fix = request.into_fix(now);

    match state.service.report_fix(&pet_id, fix).await? {
        FixDisposition::Buffered => {
            info!(pet_id = %pet_id, "Device fix buffered");
            Ok((
                StatusCode::ACCEPTED,
                Json(BufferedResponse { status: "buffered" }),
            )
                .into_response())
        }
        FixDisposition::Recorded(outcome) => {
            record_fixes_ingested(state.service.source_name(), 1);
            Ok((StatusCode::CREATED, Json(IngestResponse::from(outcome))).into_response())
        }
    }
}
