use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::TrackingService;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{alerts, chips, health, pets, safe_zones};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TrackingService>,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, service: Arc<TrackingService>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        service,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let tracking_routes = Router::new()
        // Chips
        .route("/api/v1/chips", post(chips::register_chip))
        .route("/api/v1/chips/verify", get(chips::verify_chip))
        .route("/api/v1/chips/:code/activate", post(chips::activate_chip))
        // Pets
        .route("/api/v1/pets/locations", get(pets::list_locations))
        .route("/api/v1/pets/:pet_id/status", get(pets::get_status))
        .route("/api/v1/pets/:pet_id/simulate", post(pets::simulate))
        .route("/api/v1/pets/:pet_id/fixes", post(pets::report_fix))
        .route(
            "/api/v1/pets/:pet_id/safe-zones",
            get(safe_zones::list_safe_zones),
        )
        .route("/api/v1/pets/:pet_id/alerts", get(alerts::list_alerts))
        .route(
            "/api/v1/pets/:pet_id/alerts/read-all",
            post(alerts::mark_all_as_read),
        )
        // Safe zones
        .route("/api/v1/safe-zones", post(safe_zones::create_safe_zone))
        // Alerts
        .route("/api/v1/alerts/unread-count", get(alerts::unread_count))
        .route("/api/v1/alerts/cleanup", post(alerts::cleanup))
        .route("/api/v1/alerts/:alert_id/read", post(alerts::mark_as_read));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(tracking_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
