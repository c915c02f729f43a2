use axum::{extract::State, routing::get, Json, Router};

use crate::dto::reservation_dto::VehicleResponse;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new().route("/available", get(list_available_vehicles))
}

async fn list_available_vehicles(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VehicleResponse>>> {
    let vehicles = state.reservations.list_available_vehicles().await?;
    Ok(Json(vehicles.into_iter().map(VehicleResponse::from).collect()))
}
