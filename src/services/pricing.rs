//! Cálculo del precio estimado de una reserva

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::warn;

/// Tarifa diaria cuando el servicio de flota no informa precio (100.00)
pub const DEFAULT_DAILY_RATE: Decimal = Decimal::from_parts(10000, 0, 0, false, 2);

/// Días cobrables: días completos entre inicio y fin, mínimo 1
pub fn billable_days(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_days().max(1)
}

/// Total estimado usando el precio del vehículo o la tarifa de respaldo.
///
/// Un precio negativo se trata como ausente. Devuelve `None` si el producto
/// desborda `Decimal`.
pub fn estimate_total(
    start: NaiveDateTime,
    end: NaiveDateTime,
    unit_price: Option<Decimal>,
    fallback_rate: Decimal,
) -> Option<Decimal> {
    let rate = match unit_price {
        Some(price) if price < Decimal::ZERO => {
            warn!("⚠️ Precio negativo {} ignorado, usando tarifa de respaldo", price);
            fallback_rate
        }
        Some(price) => price,
        None => fallback_rate,
    };

    Decimal::from(billable_days(start, end)).checked_mul(rate)
}
