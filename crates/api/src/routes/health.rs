//! Health check endpoint handlers.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub tracking: TrackingHealth,
}

/// Tracking pipeline summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TrackingHealth {
    pub location_source: String,
    pub pets_with_location: usize,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Full health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let pets_with_location = state.service.pets_with_location().await.len();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tracking: TrackingHealth {
            location_source: state.service.source_name().to_string(),
            pets_with_location,
        },
    })
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Storage reads never fail, so a running process is ready.
pub async fn ready() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ready".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.3.0".to_string(),
            tracking: TrackingHealth {
                location_source: "simulated".to_string(),
                pets_with_location: 2,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["tracking"]["location_source"], "simulated");
        assert_eq!(json["tracking"]["pets_with_location"], 2);
    }

    #[tokio::test]
    async fn test_live_and_ready() {
        assert_eq!(live().await.0.status, "alive");
        assert_eq!(ready().await.0.status, "ready");
    }
}
