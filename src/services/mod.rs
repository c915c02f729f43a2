//! Services module
//!
//! Este módulo contiene la lógica de negocio de las reservas.
//! `reservation_service` orquesta el resto de piezas.

pub mod availability;
pub mod events;
pub mod pricing;
pub mod reservation_service;
pub mod transitions;
pub mod vehicle_locks;

pub use reservation_service::{ReservationService, ReservationSettings};
