//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::services::reservation_service::ReservationService;

#[derive(Clone)]
pub struct AppState {
    pub reservations: Arc<ReservationService>,
}

impl AppState {
    pub fn new(reservations: ReservationService) -> Self {
        Self {
            reservations: Arc::new(reservations),
        }
    }
}
