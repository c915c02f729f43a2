//! Servicio de reservas
//!
//! Orquesta la creación de reservas y sus cambios de estado: validación de
//! fechas, disponibilidad, precio, persistencia y el reflejo best-effort del
//! estado del vehículo en el servicio de flota.
//!
//! El store es la fuente de verdad de la reserva. Las escrituras en la flota
//! ocurren después de persistir y sus fallos sólo se reportan al sink de
//! eventos; nunca deshacen ni hacen fallar la operación.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;

use crate::clients::fleet_client::FleetDirectory;
use crate::models::reservation::{NewReservation, Reservation, ReservationStatus};
use crate::models::vehicle::Vehicle;
use crate::repositories::reservation_repository::ReservationStore;
use crate::services::availability::{
    book, fetch_vehicle, fleet_error, AvailabilityPolicy, FleetSyncPolicy,
};
use crate::services::events::{ReservationEvents, TracingEvents};
use crate::services::pricing::{estimate_total, DEFAULT_DAILY_RATE};
use crate::services::transitions::{PermissiveTransitions, TransitionRule};
use crate::services::vehicle_locks::VehicleLocks;
use crate::utils::errors::ReservationError;
use crate::utils::validation::validate_date_range;

/// Reloj inyectable; por defecto la hora local
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Parámetros de negocio elegidos por despliegue
#[derive(Debug, Clone)]
pub struct ReservationSettings {
    pub availability: AvailabilityPolicy,
    pub fleet_sync: FleetSyncPolicy,
    /// Estado que la flota usa para un vehículo libre; también se escribe al liberarlo
    pub available_status: String,
    pub rented_status: String,
    pub fallback_daily_rate: Decimal,
}

impl Default for ReservationSettings {
    fn default() -> Self {
        Self {
            availability: AvailabilityPolicy::default(),
            fleet_sync: FleetSyncPolicy::default(),
            available_status: "available".to_string(),
            rented_status: "rented".to_string(),
            fallback_daily_rate: DEFAULT_DAILY_RATE,
        }
    }
}

pub struct ReservationService {
    store: Arc<dyn ReservationStore>,
    fleet: Arc<dyn FleetDirectory>,
    events: Arc<dyn ReservationEvents>,
    transitions: Arc<dyn TransitionRule>,
    settings: ReservationSettings,
    locks: VehicleLocks,
    clock: Clock,
}

impl ReservationService {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        fleet: Arc<dyn FleetDirectory>,
        settings: ReservationSettings,
    ) -> Self {
        Self {
            store,
            fleet,
            events: Arc::new(TracingEvents),
            transitions: Arc::new(PermissiveTransitions),
            settings,
            locks: VehicleLocks::new(),
            clock: Arc::new(|| Local::now().naive_local()),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn ReservationEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn with_transitions(mut self, transitions: Arc<dyn TransitionRule>) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Crear una reserva PENDING para el vehículo en [start, end)
    pub async fn create_reservation(
        &self,
        client_id: i64,
        vehicle_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Reservation, ReservationError> {
        validate_date_range(start, end)?;

        let vehicle = fetch_vehicle(self.fleet.as_ref(), vehicle_id).await?;

        let estimated_total =
            estimate_total(start, end, vehicle.price, self.settings.fallback_daily_rate)
                .ok_or_else(|| ReservationError::InvalidPrice {
                    vehicle_id,
                    reason: format!("total overflows for unit price {:?}", vehicle.price),
                })?;

        let reservation = {
            let _guard = self.locks.lock(vehicle_id).await;

            book(
                self.settings.availability,
                self.store.as_ref(),
                &vehicle,
                NewReservation {
                    client_id,
                    vehicle_id,
                    start_date: start,
                    end_date: end,
                    estimated_total,
                    status: ReservationStatus::Pending,
                },
                &self.settings.available_status,
            )
            .await?
        };

        self.events.reservation_created(&reservation);

        if self.settings.fleet_sync.should_sync(start, (self.clock)()) {
            self.mark_rented(&reservation, vehicle).await;
        }

        Ok(reservation)
    }

    pub async fn get_reservation(&self, id: i64) -> Result<Reservation, ReservationError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ReservationError::ReservationNotFound(id))
    }

    pub async fn list_reservations(&self) -> Result<Vec<Reservation>, ReservationError> {
        self.store.find_all().await
    }

    pub async fn list_reservations_by_client(
        &self,
        client_id: i64,
    ) -> Result<Vec<Reservation>, ReservationError> {
        self.store.find_by_client(client_id).await
    }

    /// Cambiar el estado de una reserva, liberando el vehículo al cerrarla
    pub async fn update_status(
        &self,
        id: i64,
        target: ReservationStatus,
    ) -> Result<Reservation, ReservationError> {
        let vehicle_id = self.get_reservation(id).await?.vehicle_id;
        let _guard = self.locks.lock(vehicle_id).await;

        // Releer bajo el lock
        let mut reservation = self.get_reservation(id).await?;
        let previous = reservation.status;

        self.transitions.check(previous, target)?;

        if target.is_terminal() && !previous.is_terminal() {
            self.release_vehicle(&reservation).await;
        }

        reservation.status = target;
        let saved = self.store.save(&reservation).await?;

        self.events.status_changed(saved.id, previous, saved.status);
        Ok(saved)
    }

    /// Vehículos de la flota cuyo estado actual es "disponible"
    pub async fn list_available_vehicles(&self) -> Result<Vec<Vehicle>, ReservationError> {
        let vehicles = self.fleet.list_vehicles().await.map_err(fleet_error)?;
        Ok(vehicles
            .into_iter()
            .filter(|v| v.has_status(&self.settings.available_status))
            .collect())
    }

    async fn mark_rented(&self, reservation: &Reservation, vehicle: Vehicle) {
        let vehicle = vehicle.with_status(&self.settings.rented_status);

        if let Err(e) = self.fleet.update_vehicle(reservation.vehicle_id, &vehicle).await {
            self.events
                .fleet_sync_failed(reservation.id, reservation.vehicle_id, &e.to_string());
        }
    }

    async fn release_vehicle(&self, reservation: &Reservation) {
        let result = async {
            let vehicle = self.fleet.get_vehicle(reservation.vehicle_id).await?;
            let vehicle = vehicle.with_status(&self.settings.available_status);
            self.fleet.update_vehicle(reservation.vehicle_id, &vehicle).await
        }
        .await;

        if let Err(e) = result {
            self.events
                .vehicle_release_failed(reservation.id, reservation.vehicle_id, &e.to_string());
        }
    }
}
