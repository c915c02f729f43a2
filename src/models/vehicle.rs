//! Modelo de Vehicle
//!
//! Snapshot de un vehículo tal como lo devuelve el servicio de flota.
//! Los nombres de campo siguen el JSON del servicio de flota.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Vehicle del servicio de flota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    #[serde(rename = "modelo", default)]
    pub model: Option<String>,
    #[serde(rename = "marca", default)]
    pub brand: Option<String>,
    #[serde(rename = "ano", default)]
    pub year: Option<i32>,
    #[serde(rename = "placa", default)]
    pub plate: Option<String>,
    #[serde(rename = "preco", default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Vehicle {
    /// Compara el estado del vehículo sin distinguir mayúsculas
    pub fn has_status(&self, expected: &str) -> bool {
        self.status
            .as_deref()
            .map(|status| status.trim().to_lowercase() == expected.trim().to_lowercase())
            .unwrap_or(false)
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }
}
