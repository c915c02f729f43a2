//! Cliente HTTP para el servicio de flota
//!
//! El servicio de flota es la fuente de verdad de los vehículos: existencia,
//! precio y estado de alquiler actual.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::vehicle::Vehicle;

/// Errores del directorio de flota
#[derive(Error, Debug)]
pub enum FleetError {
    #[error("vehicle {0} not found")]
    NotFound(i64),

    #[error("fleet transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FleetError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FleetError::Transport(format!("request timed out: {}", e))
        } else {
            FleetError::Transport(e.to_string())
        }
    }
}

/// Operaciones que el núcleo necesita del servicio de flota
#[async_trait]
pub trait FleetDirectory: Send + Sync {
    async fn get_vehicle(&self, id: i64) -> Result<Vehicle, FleetError>;

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, FleetError>;

    async fn update_vehicle(&self, id: i64, vehicle: &Vehicle) -> Result<Vehicle, FleetError>;
}

/// Cliente HTTP del servicio de flota
#[derive(Clone)]
pub struct FleetClient {
    client: Client,
    base_url: String,
}

impl FleetClient {
    /// Crear nuevo cliente con un timeout acotado por request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FleetError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn vehicles_url(&self) -> String {
        format!("{}/api/veiculos", self.base_url)
    }

    fn vehicle_url(&self, id: i64) -> String {
        format!("{}/api/veiculos/{}", self.base_url, id)
    }
}

async fn check_status(response: reqwest::Response, id: Option<i64>) -> Result<reqwest::Response, FleetError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(FleetError::NotFound(id));
    }

    let body = response.text().await.unwrap_or_default();
    warn!("⚠️ Fleet service responded {}: {}", status, body);
    Err(FleetError::Transport(format!("unexpected status {}", status)))
}

#[async_trait]
impl FleetDirectory for FleetClient {
    async fn get_vehicle(&self, id: i64) -> Result<Vehicle, FleetError> {
        let url = self.vehicle_url(id);
        debug!("🚗 GET {}", url);

        let response = self.client.get(&url).send().await?;
        let vehicle = check_status(response, Some(id)).await?.json::<Vehicle>().await?;
        Ok(vehicle)
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, FleetError> {
        let url = self.vehicles_url();
        debug!("🚗 GET {}", url);

        let response = self.client.get(&url).send().await?;
        let vehicles = check_status(response, None).await?.json::<Vec<Vehicle>>().await?;
        Ok(vehicles)
    }

    async fn update_vehicle(&self, id: i64, vehicle: &Vehicle) -> Result<Vehicle, FleetError> {
        let url = self.vehicle_url(id);
        debug!("🚗 PUT {} (status: {:?})", url, vehicle.status);

        let response = self.client.put(&url).json(vehicle).send().await?;
        let updated = check_status(response, Some(id)).await?.json::<Vehicle>().await?;
        Ok(updated)
    }
}
