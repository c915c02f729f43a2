use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::vehicle::Vehicle;

// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    #[validate(range(min = 1))]
    pub client_id: i64,

    #[validate(range(min = 1))]
    pub vehicle_id: i64,

    #[validate(custom = "crate::utils::validation::validate_not_in_past")]
    pub start_date: NaiveDateTime,

    #[validate(custom = "crate::utils::validation::validate_in_future")]
    pub end_date: NaiveDateTime,
}

// Request para cambiar el estado
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ReservationStatus,
}

// Filtros del listado
#[derive(Debug, Default, Deserialize)]
pub struct ReservationFilters {
    pub client_id: Option<i64>,
}

// Response de reserva
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ReservationResponse {
    pub id: i64,
    pub client_id: i64,
    pub vehicle_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_total: Decimal,
    pub status: ReservationStatus,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            client_id: reservation.client_id,
            vehicle_id: reservation.vehicle_id,
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            estimated_total: reservation.estimated_total,
            status: reservation.status,
        }
    }
}

// Response de vehículo disponible
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct VehicleResponse {
    pub id: i64,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub year: Option<i32>,
    pub plate: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub status: Option<String>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            model: vehicle.model,
            brand: vehicle.brand,
            year: vehicle.year,
            plate: vehicle.plate,
            price: vehicle.price,
            status: vehicle.status,
        }
    }
}
