//! Alert endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::alert::{
    AlertsAffectedResponse, ListAlertsQuery, ListAlertsResponse, UnreadCountQuery,
    UnreadCountResponse,
};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Alerts of a pet, newest first.
///
/// GET /api/v1/pets/:pet_id/alerts?limit=20
pub async fn list_alerts(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
    Query(query): Query<ListAlertsQuery>,
) -> Json<ListAlertsResponse> {
    let alerts = state
        .service
        .alerts()
        .alerts_for_pet(&pet_id, query.limit)
        .await;
    let total = alerts.len();
    Json(ListAlertsResponse { alerts, total })
}

/// Unread alerts for one pet, or all pets when `petId` is omitted.
///
/// GET /api/v1/alerts/unread-count?petId=p1
pub async fn unread_count(
    State(state): State<AppState>,
    Query(query): Query<UnreadCountQuery>,
) -> Json<UnreadCountResponse> {
    let unread = state
        .service
        .alerts()
        .unread_count(query.pet_id.as_deref())
        .await;
    Json(UnreadCountResponse { unread })
}

/// POST /api/v1/alerts/:alert_id/read
pub async fn mark_as_read(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.service.alerts().mark_as_read(alert_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Alert not found".to_string()))
    }
}

/// POST /api/v1/pets/:pet_id/alerts/read-all
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
) -> Result<Json<AlertsAffectedResponse>, ApiError> {
    let affected = state.service.alerts().mark_all_as_read(&pet_id).await?;
    Ok(Json(AlertsAffectedResponse { affected }))
}

/// Prune alerts past the retention window.
///
/// POST /api/v1/alerts/cleanup
pub async fn cleanup(State(state): State<AppState>) -> Result<Json<AlertsAffectedResponse>, ApiError> {
    let affected = state.service.alerts().cleanup_old_alerts().await?;
    info!(removed = affected, "Alert cleanup requested via API");
    Ok(Json(AlertsAffectedResponse { affected }))
}
