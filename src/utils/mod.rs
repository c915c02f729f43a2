//! Utilidades del sistema
//!
//! Este módulo contiene el manejo de errores y la validación.

pub mod errors;
pub mod validation;
