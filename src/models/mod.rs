//! Modelos del sistema
//!
//! Este módulo contiene las reservas y el snapshot de vehículo
//! que devuelve el servicio de flota.

pub mod reservation;
pub mod vehicle;
