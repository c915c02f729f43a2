//! Servicio de reservas de vehículos
//!
//! Acepta reservas sobre una flota gestionada por un servicio externo,
//! valida fechas y disponibilidad, persiste las reservas y mantiene el
//! estado de los vehículos sincronizado con la flota.

pub mod clients;
pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
