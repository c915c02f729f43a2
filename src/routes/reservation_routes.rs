use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use validator::Validate;

use crate::dto::reservation_dto::{
    CreateReservationRequest, ReservationFilters, ReservationResponse, StatusUpdateRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route("/:id", get(get_reservation))
        .route("/:id/status", patch(update_status))
}

async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    request.validate()?;

    let reservation = state
        .reservations
        .create_reservation(
            request.client_id,
            request.vehicle_id,
            request.start_date,
            request.end_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = state.reservations.get_reservation(id).await?;
    Ok(Json(reservation.into()))
}

async fn list_reservations(
    State(state): State<AppState>,
    Query(filters): Query<ReservationFilters>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    let reservations = match filters.client_id {
        Some(client_id) => state.reservations.list_reservations_by_client(client_id).await?,
        None => state.reservations.list_reservations().await?,
    };

    Ok(Json(reservations.into_iter().map(ReservationResponse::from).collect()))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<StatusUpdateRequest>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = state.reservations.update_status(id, request.status).await?;
    Ok(Json(reservation.into()))
}
