//! Common test utilities for integration tests.
//!
//! Apps are built over in-memory storage with a manual clock, so every test
//! owns its own state.

// Helpers are shared across test binaries; not every binary uses all of them.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use chrono::Utc;
use domain::services::{
    LocationSource, NoDevicePosition, RecordingNotificationSink, ReportedLocationSource,
    SimulatedLocationSource, TrackingService,
};
use domain::{InMemoryTrackingStore, ManualClock};
use pet_tracker_api::app::create_app;
use pet_tracker_api::config::{
    AlertsConfig, Config, LoggingConfig, SecurityConfig, ServerConfig, StorageSettings,
    TrackingConfig,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

/// Configuration for tests: memory storage, no demo chip.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        storage: StorageSettings {
            backend: "memory".to_string(),
            data_dir: "data".to_string(),
        },
        tracking: TrackingConfig {
            interval_secs: 30,
            ingestion: "simulated".to_string(),
            fallback_latitude: 19.4326,
            fallback_longitude: -99.1332,
            seed_demo_chip: false,
        },
        alerts: AlertsConfig::default(),
    }
}

/// Everything a test needs to drive the app and inspect its state.
pub struct TestContext {
    pub app: Router,
    pub service: Arc<TrackingService>,
    pub store: Arc<InMemoryTrackingStore>,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<RecordingNotificationSink>,
}

impl TestContext {
    /// App whose location source is the seeded simulator.
    pub fn simulated() -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let source = Arc::new(SimulatedLocationSource::with_seed(
            Arc::new(NoDevicePosition),
            clock.clone(),
            7,
        ));
        Self::build(source, clock)
    }

    /// App that buffers device-reported fixes until the next tick.
    pub fn device() -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        Self::build(Arc::new(ReportedLocationSource::new()), clock)
    }

    fn build(source: Arc<dyn LocationSource>, clock: Arc<ManualClock>) -> Self {
        let store = Arc::new(InMemoryTrackingStore::new());
        let sink = Arc::new(RecordingNotificationSink::new());
        let service = Arc::new(TrackingService::new(
            store.clone(),
            clock.clone(),
            source,
            sink.clone(),
        ));
        let app = create_app(test_config(), service.clone());
        Self {
            app,
            service,
            store,
            clock,
            sink,
        }
    }

    /// Send one request through a clone of the router.
    pub async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

/// Build a JSON request.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a POST request without a body.
pub fn post_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// Register a verified chip via the API.
pub async fn register_chip(ctx: &TestContext, code: &str, pet_id: &str) -> serde_json::Value {
    let response = ctx
        .send(json_request(
            Method::POST,
            "/api/v1/chips",
            json!({
                "chipCode": code,
                "petId": pet_id,
                "petName": "Luna",
                "ownerId": "owner-1",
                "isVerified": true
            }),
        ))
        .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    parse_response_body(response).await
}

/// A fix body at the given latitude, on the test zone's meridian.
pub fn fix_body(latitude: f64, battery: i32) -> serde_json::Value {
    json!({
        "latitude": latitude,
        "longitude": -99.1332,
        "accuracy": 5.0,
        "batteryPercent": battery,
        "signalQuality": "strong"
    })
}
