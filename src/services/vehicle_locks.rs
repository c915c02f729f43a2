//! Sección crítica por vehículo
//!
//! Serializa, dentro del proceso, las creaciones y los cambios de estado
//! que afectan al mismo vehículo.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct VehicleLocks {
    locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl VehicleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bloquear el vehículo hasta que se suelte el guard
    pub async fn lock(&self, vehicle_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Sólo el mapa mantiene la entrada: nadie la está usando
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(vehicle_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}
