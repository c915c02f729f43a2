//! Eventos estructurados del ciclo de vida de las reservas
//!
//! El núcleo reporta todo lo que no propaga (fallos al sincronizar la flota)
//! a través de este sink, que se inyecta al construir el servicio.

use tracing::{info, warn};

use crate::models::reservation::{Reservation, ReservationStatus};

/// Sink de observabilidad del núcleo de reservas
pub trait ReservationEvents: Send + Sync {
    fn reservation_created(&self, reservation: &Reservation);

    fn status_changed(&self, reservation_id: i64, previous: ReservationStatus, new: ReservationStatus);

    /// La reserva quedó guardada pero el vehículo no se marcó como alquilado
    fn fleet_sync_failed(&self, reservation_id: i64, vehicle_id: i64, error: &str);

    /// El cambio de estado se aplicó pero el vehículo no se liberó
    fn vehicle_release_failed(&self, reservation_id: i64, vehicle_id: i64, error: &str);
}

/// Implementación por defecto: eventos `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl ReservationEvents for TracingEvents {
    fn reservation_created(&self, reservation: &Reservation) {
        info!(
            event_type = "reservation_created",
            reservation_id = reservation.id,
            client_id = reservation.client_id,
            vehicle_id = reservation.vehicle_id,
            start_date = %reservation.start_date,
            end_date = %reservation.end_date,
            estimated_total = %reservation.estimated_total,
            "Reservation created"
        );
    }

    fn status_changed(&self, reservation_id: i64, previous: ReservationStatus, new: ReservationStatus) {
        info!(
            event_type = "reservation_status_changed",
            reservation_id = reservation_id,
            previous_status = %previous,
            new_status = %new,
            "Reservation status changed"
        );
    }

    fn fleet_sync_failed(&self, reservation_id: i64, vehicle_id: i64, error: &str) {
        warn!(
            event_type = "fleet_sync_failed",
            reservation_id = reservation_id,
            vehicle_id = vehicle_id,
            error = %error,
            "Could not mark vehicle as rented in fleet service"
        );
    }

    fn vehicle_release_failed(&self, reservation_id: i64, vehicle_id: i64, error: &str) {
        warn!(
            event_type = "vehicle_release_failed",
            reservation_id = reservation_id,
            vehicle_id = vehicle_id,
            error = %error,
            "Could not release vehicle in fleet service"
        );
    }
}
