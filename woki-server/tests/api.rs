//! End-to-end API tests against the in-memory backend.

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use woki_server::{Config, ServerState, StorageKind, router};

async fn test_router() -> Router {
    let config = Config {
        work_dir: std::env::temp_dir().join("woki-test"),
        http_port: 0,
        storage: StorageKind::Memory,
        log_level: "warn".into(),
        environment: "test".into(),
        webhook_urls: vec![],
        idempotency_ttl_hours: 24,
        max_combo_tables: 4,
        request_timeout_ms: 5_000,
    };
    let state = ServerState::initialize(&config).await.unwrap();
    router(state)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Create restaurant + sector + table, return (restaurant_id, sector_id)
async fn seed_catalog(router: &Router) -> (String, String) {
    let (status, restaurant) = send(
        router,
        post(
            "/api/restaurants",
            json!({
                "name": "Test Bistro",
                "timezone": "UTC",
                "windows": [{ "start": "20:00", "end": "23:45" }],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let restaurant_id = restaurant["id"].as_str().unwrap().to_string();

    let (status, sector) = send(
        router,
        post(
            "/api/sectors",
            json!({ "restaurantId": restaurant_id, "name": "Main Hall" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let sector_id = sector["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        router,
        post(
            "/api/tables",
            json!({ "sectorId": sector_id, "name": "T1", "minSize": 2, "maxSize": 4 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (restaurant_id, sector_id)
}

#[tokio::test]
async fn health_reports_ok() {
    let router = test_router().await;
    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn booking_flow_end_to_end() {
    let router = test_router().await;
    let (restaurant_id, sector_id) = seed_catalog(&router).await;

    // Availability first: the best slot opens the service window.
    let (status, availability) = send(
        &router,
        get(&format!(
            "/api/availability?restaurantId={restaurant_id}&sectorId={sector_id}\
             &partySize=3&durationMinutes=90&date=2025-10-22"
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(availability["slotMinutes"], 15);
    let first = &availability["candidates"][0];
    assert_eq!(first["kind"], "single");
    assert_eq!(first["start"], "2025-10-22T20:00:00+00:00");

    // Book it.
    let booking_body = json!({
        "restaurantId": restaurant_id,
        "sectorId": sector_id,
        "partySize": 3,
        "durationMinutes": 90,
        "date": "2025-10-22",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .header("Idempotency-Key", "client-req-1")
        .body(Body::from(booking_body.to_string()))
        .unwrap();
    let (status, booking) = send(&router, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["start"], "2025-10-22T20:00:00+00:00");
    assert_eq!(booking["end"], "2025-10-22T21:30:00+00:00");
    assert_eq!(booking["status"], "CONFIRMED");
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // Replay with the same key returns the same booking.
    let replay = Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .header("Idempotency-Key", "client-req-1")
        .body(Body::from(booking_body.to_string()))
        .unwrap();
    let (status, replayed) = send(&router, replay).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(replayed["id"], booking_id.as_str());

    // It shows up in the day listing.
    let (status, listed) = send(
        &router,
        get(&format!("/api/bookings?sectorId={sector_id}&date=2025-10-22")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Cancel, then cancelling again conflicts.
    let (status, cancelled) = send(&router, delete(&format!("/api/bookings/{booking_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (status, body) = send(&router, delete(&format!("/api/bookings/{booking_id}"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn rejects_invalid_party_size() {
    let router = test_router().await;
    let (restaurant_id, sector_id) = seed_catalog(&router).await;

    let (status, body) = send(
        &router,
        post(
            "/api/bookings",
            json!({
                "restaurantId": restaurant_id,
                "sectorId": sector_id,
                "partySize": 0,
                "durationMinutes": 90,
                "date": "2025-10-22",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn reports_no_capacity_for_oversized_party() {
    let router = test_router().await;
    let (restaurant_id, sector_id) = seed_catalog(&router).await;

    let (status, body) = send(
        &router,
        post(
            "/api/bookings",
            json!({
                "restaurantId": restaurant_id,
                "sectorId": sector_id,
                "partySize": 11,
                "durationMinutes": 90,
                "date": "2025-10-22",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "NO_CAPACITY");
}

#[tokio::test]
async fn rejects_window_outside_service_hours() {
    let router = test_router().await;
    let (restaurant_id, sector_id) = seed_catalog(&router).await;

    let (status, body) = send(
        &router,
        post(
            "/api/bookings",
            json!({
                "restaurantId": restaurant_id,
                "sectorId": sector_id,
                "partySize": 2,
                "durationMinutes": 60,
                "date": "2025-10-22",
                "windowStart": "08:00",
                "windowEnd": "10:00",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "OUTSIDE_SERVICE_WINDOW");
}

#[tokio::test]
async fn unknown_booking_is_not_found() {
    let router = test_router().await;
    let (status, body) = send(&router, get("/api/bookings/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
