//! Clients - HTTP Clients for External APIs
//!
//! This module contains the HTTP client for the fleet service.

pub mod fleet_client;

pub use fleet_client::{FleetClient, FleetDirectory, FleetError};
