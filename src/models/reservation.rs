//! Modelo de Reservation
//!
//! Este módulo contiene el struct Reservation y su estado.
//! Mapea exactamente a la tabla `reservations` (ver `sql/schema.sql`).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Estado de la reserva - se guarda como TEXT en la columna `status`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Estados que ya no bloquean el vehículo
pub const TERMINAL_STATUSES: [ReservationStatus; 2] =
    [ReservationStatus::Cancelled, ReservationStatus::Completed];

impl ReservationStatus {
    pub fn is_terminal(self) -> bool {
        TERMINAL_STATUSES.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(ReservationStatus::Pending),
            "CONFIRMED" => Ok(ReservationStatus::Confirmed),
            "CANCELLED" => Ok(ReservationStatus::Cancelled),
            "COMPLETED" => Ok(ReservationStatus::Completed),
            other => Err(format!("unknown reservation status '{}'", other)),
        }
    }
}

/// Reservation principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub client_id: i64,
    pub vehicle_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub estimated_total: Decimal,
    pub status: ReservationStatus,
}

impl Reservation {
    /// Intervalo abierto: tocar el borde no cuenta como solapamiento
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_date < end && self.end_date > start
    }
}

/// Reserva aún sin id, lista para insertar
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub client_id: i64,
    pub vehicle_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub estimated_total: Decimal,
    pub status: ReservationStatus,
}

impl NewReservation {
    pub fn into_reservation(self, id: i64) -> Reservation {
        Reservation {
            id,
            client_id: self.client_id,
            vehicle_id: self.vehicle_id,
            start_date: self.start_date,
            end_date: self.end_date,
            estimated_total: self.estimated_total,
            status: self.status,
        }
    }
}
