//! Utilidades de validación
//!
//! Este módulo contiene la validación de rangos de fechas del núcleo
//! y las validaciones de frontera usadas por los DTOs.

use chrono::{Local, NaiveDateTime};
use validator::ValidationError;

use crate::utils::errors::ReservationError;

/// Validar que la fecha de fin sea estrictamente posterior a la de inicio
pub fn validate_date_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), ReservationError> {
    if end <= start {
        return Err(ReservationError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Validar que una fecha no esté en el pasado
pub fn validate_not_in_past(value: &NaiveDateTime) -> Result<(), ValidationError> {
    validate_not_before(value, Local::now().naive_local())
}

/// Validar que una fecha esté estrictamente en el futuro
pub fn validate_in_future(value: &NaiveDateTime) -> Result<(), ValidationError> {
    validate_after(value, Local::now().naive_local())
}

fn validate_not_before(value: &NaiveDateTime, now: NaiveDateTime) -> Result<(), ValidationError> {
    if *value < now {
        let mut error = ValidationError::new("future_or_present");
        error.message = Some("start date cannot be in the past".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

fn validate_after(value: &NaiveDateTime, now: NaiveDateTime) -> Result<(), ValidationError> {
    if *value <= now {
        let mut error = ValidationError::new("future");
        error.message = Some("end date must be in the future".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
