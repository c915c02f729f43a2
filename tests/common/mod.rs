#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use vehicle_reservation::clients::{FleetDirectory, FleetError};
use vehicle_reservation::models::reservation::{Reservation, ReservationStatus};
use vehicle_reservation::models::vehicle::Vehicle;
use vehicle_reservation::repositories::InMemoryReservationRepository;
use vehicle_reservation::services::events::ReservationEvents;
use vehicle_reservation::services::reservation_service::{Clock, ReservationService, ReservationSettings};

/// Directorio de flota en memoria con fallos programables
#[derive(Default)]
pub struct FakeFleet {
    vehicles: Mutex<HashMap<i64, Vehicle>>,
    updates: Mutex<Vec<(i64, Option<String>)>>,
    unreachable: AtomicBool,
    fail_updates: AtomicBool,
    latency_ms: AtomicU64,
}

impl FakeFleet {
    pub fn with_vehicles(vehicles: Vec<Vehicle>) -> Arc<Self> {
        let fleet = Self::default();
        {
            let mut map = fleet.vehicles.lock().unwrap();
            for vehicle in vehicles {
                map.insert(vehicle.id, vehicle);
            }
        }
        Arc::new(fleet)
    }

    pub fn set_unreachable(&self, value: bool) {
        self.unreachable.store(value, Ordering::SeqCst);
    }

    pub fn set_fail_updates(&self, value: bool) {
        self.fail_updates.store(value, Ordering::SeqCst);
    }

    /// Latencia simulada de cada lectura de vehículo
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms.store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Updates recibidos: (vehicle_id, status enviado)
    pub fn updates(&self) -> Vec<(i64, Option<String>)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn status_of(&self, id: i64) -> Option<String> {
        self.vehicles.lock().unwrap().get(&id).and_then(|v| v.status.clone())
    }

    fn check_reachable(&self) -> Result<(), FleetError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(FleetError::Transport("connection timed out".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl FleetDirectory for FakeFleet {
    async fn get_vehicle(&self, id: i64) -> Result<Vehicle, FleetError> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        self.check_reachable()?;
        self.vehicles
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(FleetError::NotFound(id))
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, FleetError> {
        self.check_reachable()?;
        let mut vehicles: Vec<Vehicle> = self.vehicles.lock().unwrap().values().cloned().collect();
        vehicles.sort_by_key(|v| v.id);
        Ok(vehicles)
    }

    async fn update_vehicle(&self, id: i64, vehicle: &Vehicle) -> Result<Vehicle, FleetError> {
        self.updates.lock().unwrap().push((id, vehicle.status.clone()));
        self.check_reachable()?;
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(FleetError::Transport("fleet service returned 500".into()));
        }
        self.vehicles.lock().unwrap().insert(id, vehicle.clone());
        Ok(vehicle.clone())
    }
}

/// Sink que guarda los eventos para inspeccionarlos
#[derive(Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<String>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ReservationEvents for RecordingEvents {
    fn reservation_created(&self, reservation: &Reservation) {
        self.push(format!("created:{}", reservation.id));
    }

    fn status_changed(&self, reservation_id: i64, previous: ReservationStatus, new: ReservationStatus) {
        self.push(format!("status:{}:{}->{}", reservation_id, previous, new));
    }

    fn fleet_sync_failed(&self, reservation_id: i64, vehicle_id: i64, error: &str) {
        self.push(format!("sync_failed:{}:{}:{}", reservation_id, vehicle_id, error));
    }

    fn vehicle_release_failed(&self, reservation_id: i64, vehicle_id: i64, error: &str) {
        self.push(format!("release_failed:{}:{}:{}", reservation_id, vehicle_id, error));
    }
}

pub fn vehicle(id: i64, status: &str, price: Option<Decimal>) -> Vehicle {
    Vehicle {
        id,
        model: Some("Onix".to_string()),
        brand: Some("Chevrolet".to_string()),
        year: Some(2022),
        plate: Some(format!("ABC{:04}", id)),
        price,
        status: Some(status.to_string()),
    }
}

/// 2030-06-{day} {hour}:00
pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 6, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Reloj fijo: 2030-06-01 08:00
pub fn fixed_clock() -> Clock {
    Arc::new(|| at(1, 8))
}

pub struct Harness {
    pub service: ReservationService,
    pub store: InMemoryReservationRepository,
    pub fleet: Arc<FakeFleet>,
    pub events: Arc<RecordingEvents>,
}

pub fn harness(settings: ReservationSettings, vehicles: Vec<Vehicle>) -> Harness {
    let store = InMemoryReservationRepository::new();
    let fleet = FakeFleet::with_vehicles(vehicles);
    let events = Arc::new(RecordingEvents::default());

    let service = ReservationService::new(Arc::new(store.clone()), fleet.clone(), settings)
        .with_events(events.clone())
        .with_clock(fixed_clock());

    Harness {
        service,
        store,
        fleet,
        events,
    }
}
