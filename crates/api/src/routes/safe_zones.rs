//! Safe zone endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::safe_zone::ListSafeZonesResponse;
use domain::models::{CreateSafeZoneRequest, SafeZone};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Create a safe zone for a pet.
///
/// POST /api/v1/safe-zones
pub async fn create_safe_zone(
    State(state): State<AppState>,
    Json(request): Json<CreateSafeZoneRequest>,
) -> Result<(StatusCode, Json<SafeZone>), ApiError> {
    request.validate()?;

    let zone = state.service.create_safe_zone(request).await?;

    info!(
        zone_id = %zone.id,
        pet_id = %zone.pet_id,
        name = %zone.name,
        "Safe zone created via API"
    );

    Ok((StatusCode::CREATED, Json(zone)))
}

/// Active safe zones of a pet.
///
/// GET /api/v1/pets/:pet_id/safe-zones
pub async fn list_safe_zones(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
) -> Json<ListSafeZonesResponse> {
    let safe_zones = state.service.safe_zones(&pet_id).await;
    let total = safe_zones.len();
    Json(ListSafeZonesResponse { safe_zones, total })
}
