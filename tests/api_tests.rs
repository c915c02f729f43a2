mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{vehicle, FakeFleet};
use vehicle_reservation::repositories::InMemoryReservationRepository;
use vehicle_reservation::routes::create_app;
use vehicle_reservation::services::availability::{AvailabilityPolicy, FleetSyncPolicy};
use vehicle_reservation::services::reservation_service::{ReservationService, ReservationSettings};
use vehicle_reservation::state::AppState;

// Función helper para crear la app de test
fn create_test_app(fleet: Arc<FakeFleet>) -> Router {
    let settings = ReservationSettings {
        availability: AvailabilityPolicy::OverlapQuery,
        fleet_sync: FleetSyncPolicy::StartsToday,
        ..ReservationSettings::default()
    };
    let service = ReservationService::new(
        Arc::new(InMemoryReservationRepository::new()),
        fleet,
        settings,
    );
    create_app(AppState::new(service), &[])
}

fn days_from_now(days: i64) -> NaiveDateTime {
    Local::now().naive_local() + Duration::days(days)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn reservation_body(client_id: i64, vehicle_id: i64, start: NaiveDateTime, end: NaiveDateTime) -> Value {
    json!({
        "client_id": client_id,
        "vehicle_id": vehicle_id,
        "start_date": start,
        "end_date": end,
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(FakeFleet::with_vehicles(vec![]));
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_and_fetch_reservation() {
    let app = create_test_app(FakeFleet::with_vehicles(vec![vehicle(
        1,
        "available",
        Some(Decimal::new(120, 0)),
    )]));

    let (status, created) = send(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_body(10, 1, days_from_now(5), days_from_now(7))),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["estimated_total"], json!(240.0));

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/reservations/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_with_past_start_is_bad_request() {
    let app = create_test_app(FakeFleet::with_vehicles(vec![vehicle(1, "available", None)]));

    let (status, body) = send(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_body(10, 1, days_from_now(-2), days_from_now(3))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_with_reversed_dates_is_bad_request() {
    let app = create_test_app(FakeFleet::with_vehicles(vec![vehicle(1, "available", None)]));

    let (status, body) = send(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_body(10, 1, days_from_now(6), days_from_now(4))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_conflicting_reservation_is_conflict() {
    let app = create_test_app(FakeFleet::with_vehicles(vec![vehicle(1, "available", None)]));
    let (start, end) = (days_from_now(5), days_from_now(7));

    let (status, _) = send(&app, "POST", "/api/reservations", Some(reservation_body(10, 1, start, end))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_body(11, 1, start + Duration::days(1), end + Duration::days(1))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "VEHICLE_UNAVAILABLE");
}

#[tokio::test]
async fn test_unknown_vehicle_is_not_found() {
    let app = create_test_app(FakeFleet::with_vehicles(vec![]));

    let (status, body) = send(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_body(10, 77, days_from_now(5), days_from_now(7))),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "VEHICLE_NOT_FOUND");
}

#[tokio::test]
async fn test_unreachable_fleet_is_service_unavailable() {
    let fleet = FakeFleet::with_vehicles(vec![vehicle(1, "available", None)]);
    fleet.set_unreachable(true);
    let app = create_test_app(fleet);

    let (status, body) = send(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_body(10, 1, days_from_now(5), days_from_now(7))),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "FLEET_DIRECTORY_UNREACHABLE");

    let (status, _) = send(&app, "GET", "/api/vehicles/available", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_update_status_and_release() {
    let fleet = FakeFleet::with_vehicles(vec![vehicle(1, "rented", None)]);
    let app = create_test_app(fleet.clone());

    let (_, created) = send(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_body(10, 1, days_from_now(5), days_from_now(7))),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/reservations/{}/status", id),
        Some(json!({ "status": "CANCELLED" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "CANCELLED");
    assert_eq!(fleet.status_of(1).as_deref(), Some("available"));
}

#[tokio::test]
async fn test_missing_reservation_is_not_found() {
    let app = create_test_app(FakeFleet::with_vehicles(vec![]));

    let (status, body) = send(&app, "GET", "/api/reservations/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESERVATION_NOT_FOUND");

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/reservations/404/status",
        Some(json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_reservations_filters_by_client() {
    let app = create_test_app(FakeFleet::with_vehicles(vec![
        vehicle(1, "available", None),
        vehicle(2, "available", None),
    ]));

    send(&app, "POST", "/api/reservations", Some(reservation_body(10, 1, days_from_now(5), days_from_now(6)))).await;
    send(&app, "POST", "/api/reservations", Some(reservation_body(20, 2, days_from_now(5), days_from_now(6)))).await;

    let (status, all) = send(&app, "GET", "/api/reservations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, mine) = send(&app, "GET", "/api/reservations?client_id=20", None).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["vehicle_id"], 2);
}

#[tokio::test]
async fn test_available_vehicles() {
    let app = create_test_app(FakeFleet::with_vehicles(vec![
        vehicle(1, "available", None),
        vehicle(2, "rented", None),
    ]));

    let (status, body) = send(&app, "GET", "/api/vehicles/available", None).await;

    assert_eq!(status, StatusCode::OK);
    let vehicles = body.as_array().unwrap();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0]["id"], 1);
}

#[tokio::test]
async fn test_unpriceable_vehicle_is_bad_gateway() {
    let app = create_test_app(FakeFleet::with_vehicles(vec![vehicle(1, "available", Some(Decimal::MAX))]));

    let (status, body) = send(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_body(10, 1, days_from_now(5), days_from_now(7))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "INVALID_PRICE");
}
