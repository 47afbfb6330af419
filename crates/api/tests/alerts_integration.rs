//! Integration tests for alert generation and alert endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    fix_body, get_request, json_request, parse_response_body, post_request, register_chip,
    TestContext,
};
use serde_json::json;

async fn setup_zone(ctx: &TestContext) {
    register_chip(ctx, "CHIP-1234-5678-9012", "p1").await;
    let response = ctx
        .send(json_request(
            Method::POST,
            "/api/v1/safe-zones",
            json!({
                "petId": "p1",
                "name": "Home",
                "centerLatitude": 19.4326,
                "centerLongitude": -99.1332,
                "radiusMeters": 300.0
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn report(ctx: &TestContext, latitude: f64, battery: i32) -> serde_json::Value {
    let response = ctx
        .send(json_request(
            Method::POST,
            "/api/v1/pets/p1/fixes",
            fix_body(latitude, battery),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    parse_response_body(response).await
}

#[tokio::test]
async fn test_leaving_zone_raises_zone_exit_alert() {
    let ctx = TestContext::simulated();
    setup_zone(&ctx).await;

    let inside = report(&ctx, 19.4326, 90).await;
    assert_eq!(inside["alerts"].as_array().unwrap().len(), 0);

    ctx.clock.advance(chrono::Duration::seconds(30));
    let outside = report(&ctx, 19.4426, 90).await;
    let alerts = outside["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["type"], "zone_exit");
    assert_eq!(alerts[0]["priority"], "high");
    assert_eq!(alerts[0]["isRead"], false);
    assert_eq!(ctx.sink.dispatched().len(), 1);

    let response = ctx.send(get_request("/api/v1/pets/p1/alerts")).await;
    let body = parse_response_body(response).await;
    assert_eq!(body["total"], 1);

    let response = ctx
        .send(get_request("/api/v1/alerts/unread-count?petId=p1"))
        .await;
    assert_eq!(parse_response_body(response).await["unread"], 1);

    let response = ctx.send(get_request("/api/v1/pets/p1/status")).await;
    assert_eq!(parse_response_body(response).await["isInSafeZone"], false);
}

#[tokio::test]
async fn test_low_battery_alert_is_throttled() {
    let ctx = TestContext::simulated();
    register_chip(&ctx, "CHIP-1234-5678-9012", "p1").await;

    let first = report(&ctx, 19.4326, 15).await;
    assert_eq!(first["alerts"][0]["type"], "low_battery");

    ctx.clock.advance(chrono::Duration::minutes(10));
    let second = report(&ctx, 19.4326, 12).await;
    assert_eq!(second["alerts"].as_array().unwrap().len(), 0);

    let response = ctx.send(get_request("/api/v1/pets/p1/status")).await;
    assert_eq!(parse_response_body(response).await["status"], "low_battery");
}

#[tokio::test]
async fn test_mark_alerts_read() {
    let ctx = TestContext::simulated();
    setup_zone(&ctx).await;
    report(&ctx, 19.4326, 15).await;
    ctx.clock.advance(chrono::Duration::seconds(30));
    let outside = report(&ctx, 19.4426, 15).await;
    let alert_id = outside["alerts"][0]["id"].as_str().unwrap().to_string();

    let response = ctx.send(get_request("/api/v1/alerts/unread-count")).await;
    assert_eq!(parse_response_body(response).await["unread"], 2);

    let response = ctx
        .send(post_request(&format!("/api/v1/alerts/{}/read", alert_id)))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .send(post_request(&format!(
            "/api/v1/alerts/{}/read",
            uuid::Uuid::new_v4()
        )))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .send(post_request("/api/v1/pets/p1/alerts/read-all"))
        .await;
    assert_eq!(parse_response_body(response).await["affected"], 1);

    let response = ctx.send(get_request("/api/v1/alerts/unread-count")).await;
    assert_eq!(parse_response_body(response).await["unread"], 0);
}

#[tokio::test]
async fn test_list_alerts_limit() {
    let ctx = TestContext::simulated();
    setup_zone(&ctx).await;
    report(&ctx, 19.4326, 15).await;
    ctx.clock.advance(chrono::Duration::seconds(30));
    report(&ctx, 19.4426, 90).await;

    let response = ctx.send(get_request("/api/v1/pets/p1/alerts?limit=1")).await;
    let body = parse_response_body(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["alerts"][0]["type"], "zone_exit");
}

#[tokio::test]
async fn test_cleanup_removes_expired_alerts() {
    let ctx = TestContext::simulated();
    register_chip(&ctx, "CHIP-1234-5678-9012", "p1").await;
    report(&ctx, 19.4326, 15).await;

    let response = ctx.send(post_request("/api/v1/alerts/cleanup")).await;
    assert_eq!(parse_response_body(response).await["affected"], 0);

    ctx.clock.advance(chrono::Duration::days(31));
    let response = ctx.send(post_request("/api/v1/alerts/cleanup")).await;
    assert_eq!(parse_response_body(response).await["affected"], 1);

    let response = ctx.send(get_request("/api/v1/pets/p1/alerts")).await;
    assert_eq!(parse_response_body(response).await["total"], 0);
}
