//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y las políticas de negocio
//! elegidas por despliegue.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;

use crate::services::availability::{AvailabilityPolicy, FleetSyncPolicy};
use crate::services::pricing::DEFAULT_DAILY_RATE;
use crate::services::reservation_service::ReservationSettings;
use crate::services::transitions::TransitionMode;

pub const DEFAULT_FLEET_SERVICE_URL: &str = "https://ms-veiculos.onrender.com";

/// Dónde se guardan las reservas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown reservation store '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub fleet_service_url: String,
    pub fleet_timeout: Duration,
    pub store: StoreBackend,
    pub transitions: TransitionMode,
    pub reservations: ReservationSettings,
}

impl EnvironmentConfig {
    /// Leer la configuración desde el entorno, con valores por defecto
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ReservationSettings::default();

        let reservations = ReservationSettings {
            availability: parse_or(&lookup, "AVAILABILITY_POLICY", AvailabilityPolicy::default())?,
            fleet_sync: parse_or(&lookup, "FLEET_SYNC_POLICY", FleetSyncPolicy::default())?,
            available_status: lookup("VEHICLE_AVAILABLE_STATUS").unwrap_or(defaults.available_status),
            rented_status: lookup("VEHICLE_RENTED_STATUS").unwrap_or(defaults.rented_status),
            fallback_daily_rate: parse_or(&lookup, "FALLBACK_DAILY_RATE", DEFAULT_DAILY_RATE)?,
        };

        if reservations.fallback_daily_rate < Decimal::ZERO {
            return Err(anyhow!("FALLBACK_DAILY_RATE must not be negative"));
        }

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            fleet_service_url: lookup("FLEET_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_FLEET_SERVICE_URL.to_string()),
            fleet_timeout: Duration::from_millis(parse_or(&lookup, "FLEET_TIMEOUT_MS", 5000)?),
            store: parse_or(&lookup, "RESERVATION_STORE", StoreBackend::Postgres)?,
            transitions: parse_or(&lookup, "RESERVATION_TRANSITIONS", TransitionMode::default())?,
            reservations,
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}
