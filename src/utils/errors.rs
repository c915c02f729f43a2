//! Sistema de manejo de errores
//!
//! Este módulo define los errores del núcleo de reservas y su conversión
//! a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::reservation::{Reservation, ReservationStatus};

/// Errores del núcleo de reservas
#[derive(Error, Debug)]
pub enum ReservationError {
    #[error("end date {end} must be after start date {start}")]
    InvalidDateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("vehicle {0} not found in fleet directory")]
    VehicleNotFound(i64),

    #[error("reservation {0} not found")]
    ReservationNotFound(i64),

    #[error("vehicle {vehicle_id} is not available: {reason}")]
    VehicleUnavailable { vehicle_id: i64, reason: String },

    #[error("cannot price reservation for vehicle {vehicle_id}: {reason}")]
    InvalidPrice { vehicle_id: i64, reason: String },

    #[error("fleet directory unreachable: {0}")]
    FleetDirectoryUnreachable(String),

    #[error("transition from {from} to {to} is not allowed")]
    TransitionRejected {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("reservation store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Errores de la capa HTTP
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Reservation(#[from] ReservationError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }
}

impl ReservationError {
    /// Conflicto con una reserva activa del mismo vehículo
    pub fn overlapping(vehicle_id: i64, conflict: &Reservation) -> Self {
        ReservationError::VehicleUnavailable {
            vehicle_id,
            reason: format!(
                "overlaps reservation {} ({} - {})",
                conflict.id, conflict.start_date, conflict.end_date
            ),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ReservationError::InvalidDateRange { .. } => StatusCode::BAD_REQUEST,
            ReservationError::VehicleNotFound(_) | ReservationError::ReservationNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ReservationError::VehicleUnavailable { .. }
            | ReservationError::TransitionRejected { .. } => StatusCode::CONFLICT,
            ReservationError::InvalidPrice { .. } => StatusCode::BAD_GATEWAY,
            ReservationError::FleetDirectoryUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ReservationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ReservationError::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            ReservationError::VehicleNotFound(_) => "VEHICLE_NOT_FOUND",
            ReservationError::ReservationNotFound(_) => "RESERVATION_NOT_FOUND",
            ReservationError::VehicleUnavailable { .. } => "VEHICLE_UNAVAILABLE",
            ReservationError::InvalidPrice { .. } => "INVALID_PRICE",
            ReservationError::FleetDirectoryUnreachable(_) => "FLEET_DIRECTORY_UNREACHABLE",
            ReservationError::TransitionRejected { .. } => "TRANSITION_REJECTED",
            ReservationError::Store(_) => "DB_ERROR",
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Reservation(e) => e.status_code(),
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Reservation(ReservationError::Store(e)) => {
                error!("Database error: {}", e);
                ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    "DB_ERROR",
                )
            }

            AppError::Reservation(e) => {
                warn!(code = e.code(), "Reservation request rejected: {}", e);
                let error = status.canonical_reason().unwrap_or("Error");
                ErrorResponse::new(error, e.to_string(), e.code())
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: "The provided data is invalid".to_string(),
                    details: Some(json!(e)),
                    code: Some("VALIDATION_ERROR".to_string()),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;
