//! Reglas de transición de estado de una reserva

use std::str::FromStr;
use std::sync::Arc;

use crate::models::reservation::ReservationStatus;
use crate::utils::errors::ReservationError;

/// Decide si una reserva puede pasar de un estado a otro
pub trait TransitionRule: Send + Sync {
    fn check(&self, from: ReservationStatus, to: ReservationStatus) -> Result<(), ReservationError>;
}

/// Acepta cualquier transición, incluso COMPLETED -> PENDING
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveTransitions;

impl TransitionRule for PermissiveTransitions {
    fn check(&self, _from: ReservationStatus, _to: ReservationStatus) -> Result<(), ReservationError> {
        Ok(())
    }
}

/// Matriz del ciclo de vida: PENDING -> CONFIRMED -> COMPLETED, cancelable
/// mientras no sea terminal. Repetir el estado actual siempre se acepta.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleTransitions;

impl TransitionRule for LifecycleTransitions {
    fn check(&self, from: ReservationStatus, to: ReservationStatus) -> Result<(), ReservationError> {
        use ReservationStatus::*;

        let allowed = from == to
            || matches!(
                (from, to),
                (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
            );

        if allowed {
            Ok(())
        } else {
            Err(ReservationError::TransitionRejected { from, to })
        }
    }
}

/// Regla elegida por configuración
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionMode {
    #[default]
    Permissive,
    Lifecycle,
}

impl TransitionMode {
    pub fn rule(self) -> Arc<dyn TransitionRule> {
        match self {
            TransitionMode::Permissive => Arc::new(PermissiveTransitions),
            TransitionMode::Lifecycle => Arc::new(LifecycleTransitions),
        }
    }
}

impl FromStr for TransitionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(TransitionMode::Permissive),
            "lifecycle" => Ok(TransitionMode::Lifecycle),
            other => Err(format!("unknown transition mode '{}'", other)),
        }
    }
}
