//! Resolución de disponibilidad y políticas de sincronización
//!
//! Hay dos formas mutuamente excluyentes de decidir si un vehículo se puede
//! reservar, y dos de reflejar la reserva en el servicio de flota. Cada
//! despliegue elige una de cada mediante configuración.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::clients::fleet_client::{FleetDirectory, FleetError};
use crate::models::reservation::{NewReservation, Reservation, TERMINAL_STATUSES};
use crate::models::vehicle::Vehicle;
use crate::repositories::reservation_repository::ReservationStore;
use crate::utils::errors::ReservationError;

/// Cómo se decide la disponibilidad de un vehículo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AvailabilityPolicy {
    #[default]
    /// Busca reservas activas que solapen el intervalo pedido.
    /// Ignora el estado actual del vehículo en la flota.
    OverlapQuery,
    /// Exige que el estado actual del vehículo sea "disponible".
    /// Ignora las fechas de otras reservas.
    LiveStatus,
}

impl FromStr for AvailabilityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overlap" | "overlap-query" => Ok(AvailabilityPolicy::OverlapQuery),
            "live-status" | "live_status" => Ok(AvailabilityPolicy::LiveStatus),
            other => Err(format!("unknown availability policy '{}'", other)),
        }
    }
}

impl fmt::Display for AvailabilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityPolicy::OverlapQuery => f.write_str("overlap"),
            AvailabilityPolicy::LiveStatus => f.write_str("live-status"),
        }
    }
}

/// Cuándo se marca el vehículo como alquilado tras crear la reserva
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FleetSyncPolicy {
    Always,
    #[default]
    /// Sólo si la reserva empieza hoy; las reservas diferidas no tocan la flota
    StartsToday,
}

impl FleetSyncPolicy {
    pub fn should_sync(self, start: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            FleetSyncPolicy::Always => true,
            FleetSyncPolicy::StartsToday => start.date() == now.date(),
        }
    }
}

impl FromStr for FleetSyncPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(FleetSyncPolicy::Always),
            "starts-today" | "starts_today" => Ok(FleetSyncPolicy::StartsToday),
            other => Err(format!("unknown fleet sync policy '{}'", other)),
        }
    }
}

impl fmt::Display for FleetSyncPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FleetSyncPolicy::Always => f.write_str("always"),
            FleetSyncPolicy::StartsToday => f.write_str("starts-today"),
        }
    }
}

/// Traducir un error de flota al error del núcleo
pub fn fleet_error(error: FleetError) -> ReservationError {
    match error {
        FleetError::NotFound(id) => ReservationError::VehicleNotFound(id),
        FleetError::Transport(msg) => ReservationError::FleetDirectoryUnreachable(msg),
    }
}

/// Obtener el snapshot actual del vehículo
pub async fn fetch_vehicle(
    directory: &dyn FleetDirectory,
    vehicle_id: i64,
) -> Result<Vehicle, ReservationError> {
    directory.get_vehicle(vehicle_id).await.map_err(fleet_error)
}

/// Exigir que el estado actual del vehículo en la flota sea "disponible"
pub fn ensure_live_status(
    vehicle_id: i64,
    vehicle: &Vehicle,
    available_status: &str,
) -> Result<(), ReservationError> {
    if vehicle.has_status(available_status) {
        return Ok(());
    }
    Err(ReservationError::VehicleUnavailable {
        vehicle_id,
        reason: format!(
            "current status is '{}'",
            vehicle.status.as_deref().unwrap_or("unknown")
        ),
    })
}

/// Comprobar la disponibilidad según la política y persistir la reserva.
///
/// Con `OverlapQuery` la comprobación y el insert los hace el store de forma
/// atómica; con `LiveStatus` sólo cuenta el snapshot del vehículo.
pub async fn book(
    policy: AvailabilityPolicy,
    store: &dyn ReservationStore,
    vehicle: &Vehicle,
    reservation: NewReservation,
    available_status: &str,
) -> Result<Reservation, ReservationError> {
    match policy {
        AvailabilityPolicy::OverlapQuery => {
            store
                .create_unless_overlapping(reservation, &TERMINAL_STATUSES)
                .await
        }
        AvailabilityPolicy::LiveStatus => {
            ensure_live_status(reservation.vehicle_id, vehicle, available_status)?;
            store.create(reservation).await
        }
    }
}
