use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::warn;

use crate::models::reservation::{NewReservation, Reservation, ReservationStatus};
use crate::utils::errors::ReservationError;

/// Almacenamiento de reservas usado por el núcleo
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Insertar una reserva nueva; el store asigna el id
    async fn create(&self, reservation: NewReservation) -> Result<Reservation, ReservationError>;

    /// Guardar una reserva existente
    async fn save(&self, reservation: &Reservation) -> Result<Reservation, ReservationError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, ReservationError>;

    async fn find_all(&self) -> Result<Vec<Reservation>, ReservationError>;

    async fn find_by_client(&self, client_id: i64) -> Result<Vec<Reservation>, ReservationError>;

    /// Reservas del vehículo que solapan [start, end) y cuyo estado no está excluido
    async fn find_overlapping(
        &self,
        vehicle_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        excluded: &[ReservationStatus],
    ) -> Result<Vec<Reservation>, ReservationError>;

    /// Insertar la reserva sólo si ninguna otra no excluida la solapa.
    /// La consulta y el insert son atómicos respecto de otras llamadas
    /// para el mismo vehículo, también entre procesos que comparten el store.
    async fn create_unless_overlapping(
        &self,
        reservation: NewReservation,
        excluded: &[ReservationStatus],
    ) -> Result<Reservation, ReservationError>;
}

// Fila tal como sale de la tabla; status se guarda como TEXT
#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: i64,
    client_id: i64,
    vehicle_id: i64,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    estimated_total: Decimal,
    status: String,
}

impl ReservationRow {
    fn into_reservation(self) -> Result<Reservation, ReservationError> {
        let status = self.status.parse::<ReservationStatus>().map_err(|e| {
            warn!(reservation_id = self.id, "Invalid status stored: {}", e);
            ReservationError::Store(sqlx::Error::Decode(e.into()))
        })?;

        Ok(Reservation {
            id: self.id,
            client_id: self.client_id,
            vehicle_id: self.vehicle_id,
            start_date: self.start_date,
            end_date: self.end_date,
            estimated_total: self.estimated_total,
            status,
        })
    }
}

fn into_reservations(rows: Vec<ReservationRow>) -> Result<Vec<Reservation>, ReservationError> {
    rows.into_iter().map(ReservationRow::into_reservation).collect()
}

const COLUMNS: &str = "id, client_id, vehicle_id, start_date, end_date, estimated_total, status";

fn insert_query() -> String {
    format!(
        r#"
        INSERT INTO reservations (client_id, vehicle_id, start_date, end_date, estimated_total, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    )
}

fn overlap_query() -> String {
    format!(
        r#"
        SELECT {COLUMNS} FROM reservations
        WHERE vehicle_id = $1
          AND start_date < $3
          AND end_date > $2
          AND NOT (status = ANY($4))
        ORDER BY start_date
        "#
    )
}

fn status_labels(statuses: &[ReservationStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for ReservationRepository {
    async fn create(&self, reservation: NewReservation) -> Result<Reservation, ReservationError> {
        let row = sqlx::query_as::<_, ReservationRow>(&insert_query())
            .bind(reservation.client_id)
            .bind(reservation.vehicle_id)
            .bind(reservation.start_date)
            .bind(reservation.end_date)
            .bind(reservation.estimated_total)
            .bind(reservation.status.as_str())
            .fetch_one(&self.pool)
            .await?;

        row.into_reservation()
    }

    async fn save(&self, reservation: &Reservation) -> Result<Reservation, ReservationError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
            UPDATE reservations
            SET client_id = $2, vehicle_id = $3, start_date = $4, end_date = $5,
                estimated_total = $6, status = $7
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(reservation.id)
        .bind(reservation.client_id)
        .bind(reservation.vehicle_id)
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .bind(reservation.estimated_total)
        .bind(reservation.status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ReservationError::ReservationNotFound(reservation.id))?;

        row.into_reservation()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, ReservationError> {
        sqlx::query_as::<_, ReservationRow>(&format!("SELECT {COLUMNS} FROM reservations WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ReservationRow::into_reservation)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<Reservation>, ReservationError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {COLUMNS} FROM reservations ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_reservations(rows)
    }

    async fn find_by_client(&self, client_id: i64) -> Result<Vec<Reservation>, ReservationError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {COLUMNS} FROM reservations WHERE client_id = $1 ORDER BY start_date"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        into_reservations(rows)
    }

    async fn find_overlapping(
        &self,
        vehicle_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        excluded: &[ReservationStatus],
    ) -> Result<Vec<Reservation>, ReservationError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&overlap_query())
            .bind(vehicle_id)
            .bind(start)
            .bind(end)
            .bind(status_labels(excluded))
            .fetch_all(&self.pool)
            .await?;

        into_reservations(rows)
    }

    async fn create_unless_overlapping(
        &self,
        reservation: NewReservation,
        excluded: &[ReservationStatus],
    ) -> Result<Reservation, ReservationError> {
        let mut tx = self.pool.begin().await?;

        // Lock de transacción por vehículo: se libera en commit o rollback
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(reservation.vehicle_id)
            .execute(&mut *tx)
            .await?;

        let conflict = sqlx::query_as::<_, ReservationRow>(&overlap_query())
            .bind(reservation.vehicle_id)
            .bind(reservation.start_date)
            .bind(reservation.end_date)
            .bind(status_labels(excluded))
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(row) = conflict {
            let conflict = row.into_reservation()?;
            tx.rollback().await?;
            return Err(ReservationError::overlapping(reservation.vehicle_id, &conflict));
        }

        let row = sqlx::query_as::<_, ReservationRow>(&insert_query())
            .bind(reservation.client_id)
            .bind(reservation.vehicle_id)
            .bind(reservation.start_date)
            .bind(reservation.end_date)
            .bind(reservation.estimated_total)
            .bind(reservation.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.into_reservation()
    }
}
