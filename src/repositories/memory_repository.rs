//! Store de reservas en memoria
//!
//! Se usa en los tests y para levantar el servicio sin PostgreSQL
//! (`RESERVATION_STORE=memory`).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use super::reservation_repository::ReservationStore;
use crate::models::reservation::{NewReservation, Reservation, ReservationStatus};
use crate::utils::errors::ReservationError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    reservations: BTreeMap<i64, Reservation>,
}

impl Inner {
    fn insert(&mut self, reservation: NewReservation) -> Reservation {
        self.next_id += 1;
        let reservation = reservation.into_reservation(self.next_id);
        self.reservations.insert(reservation.id, reservation.clone());
        reservation
    }

    fn overlapping(
        &self,
        vehicle_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        excluded: &[ReservationStatus],
    ) -> Vec<Reservation> {
        let mut found: Vec<Reservation> = self
            .reservations
            .values()
            .filter(|r| r.vehicle_id == vehicle_id)
            .filter(|r| !excluded.contains(&r.status))
            .filter(|r| r.overlaps(start, end))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.start_date);
        found
    }
}

#[derive(Clone, Default)]
pub struct InMemoryReservationRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationRepository {
    async fn create(&self, reservation: NewReservation) -> Result<Reservation, ReservationError> {
        Ok(self.inner.write().await.insert(reservation))
    }

    async fn save(&self, reservation: &Reservation) -> Result<Reservation, ReservationError> {
        let mut inner = self.inner.write().await;
        match inner.reservations.get_mut(&reservation.id) {
            Some(stored) => {
                *stored = reservation.clone();
                Ok(reservation.clone())
            }
            None => Err(ReservationError::ReservationNotFound(reservation.id)),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, ReservationError> {
        Ok(self.inner.read().await.reservations.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Reservation>, ReservationError> {
        Ok(self.inner.read().await.reservations.values().cloned().collect())
    }

    async fn find_by_client(&self, client_id: i64) -> Result<Vec<Reservation>, ReservationError> {
        let inner = self.inner.read().await;
        let mut found: Vec<Reservation> = inner
            .reservations
            .values()
            .filter(|r| r.client_id == client_id)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.start_date);
        Ok(found)
    }

    async fn find_overlapping(
        &self,
        vehicle_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        excluded: &[ReservationStatus],
    ) -> Result<Vec<Reservation>, ReservationError> {
        Ok(self
            .inner
            .read()
            .await
            .overlapping(vehicle_id, start, end, excluded))
    }

    async fn create_unless_overlapping(
        &self,
        reservation: NewReservation,
        excluded: &[ReservationStatus],
    ) -> Result<Reservation, ReservationError> {
        let mut inner = self.inner.write().await;

        let conflicts = inner.overlapping(
            reservation.vehicle_id,
            reservation.start_date,
            reservation.end_date,
            excluded,
        );
        if let Some(conflict) = conflicts.first() {
            return Err(ReservationError::overlapping(reservation.vehicle_id, conflict));
        }

        Ok(inner.insert(reservation))
    }
}
