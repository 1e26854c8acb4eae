//! `PostgreSQL`-backed booking store.

use crate::storage_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use slotwise_core::repository::{BookingRepository, Result};
use slotwise_core::{
    Booking, BookingId, BookingStatus, DomainError, Money, SlotId, TimeWindow, UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

type BookingRow = (
    Uuid,           // id
    Uuid,           // customer_id
    Uuid,           // landlord_id
    Uuid,           // parking_slot_id
    Decimal,        // price_per_hour
    DateTime<Utc>,  // time_from
    DateTime<Utc>,  // time_until
    String,         // status
    DateTime<Utc>,  // created_at
);

fn status_to_str(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "PENDING",
        BookingStatus::Confirmed => "CONFIRMED",
        BookingStatus::Cancelled => "CANCELLED",
    }
}

fn status_from_str(s: &str) -> Result<BookingStatus> {
    match s {
        "PENDING" => Ok(BookingStatus::Pending),
        "CONFIRMED" => Ok(BookingStatus::Confirmed),
        "CANCELLED" => Ok(BookingStatus::Cancelled),
        other => Err(DomainError::Storage(format!(
            "unknown booking status in database: {other}"
        ))),
    }
}

fn row_to_booking(row: BookingRow) -> Result<Booking> {
    let (id, customer_id, landlord_id, parking_slot_id, price, from, until, status, created_at) =
        row;
    Ok(Booking {
        id: BookingId::from_uuid(id),
        customer_id: UserId::from_uuid(customer_id),
        landlord_id: UserId::from_uuid(landlord_id),
        parking_slot_id: SlotId::from_uuid(parking_slot_id),
        price_per_hour: Money::from_decimal(price),
        window: TimeWindow { from, until },
        status: status_from_str(&status)?,
        created_at,
    })
}

/// `PostgreSQL` implementation of [`BookingRepository`].
#[derive(Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the bookings table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS bookings (
                id UUID PRIMARY KEY,
                customer_id UUID NOT NULL,
                landlord_id UUID NOT NULL,
                parking_slot_id UUID NOT NULL,
                price_per_hour NUMERIC NOT NULL,
                time_from TIMESTAMPTZ NOT NULL,
                time_until TIMESTAMPTZ NOT NULL,
                status TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to create bookings schema", &e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS bookings_customer_idx ON bookings (customer_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to create bookings index", &e))?;
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingStore {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO bookings (
                id, customer_id, landlord_id, parking_slot_id,
                price_per_hour, time_from, time_until, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.customer_id.as_uuid())
        .bind(booking.landlord_id.as_uuid())
        .bind(booking.parking_slot_id.as_uuid())
        .bind(booking.price_per_hour.as_decimal())
        .bind(booking.window.from)
        .bind(booking.window.until)
        .bind(status_to_str(booking.status))
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to insert booking", &e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(
            r"
            SELECT id, customer_id, landlord_id, parking_slot_id,
                   price_per_hour, time_from, time_until, status, created_at
            FROM bookings WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to query booking", &e))?;

        row.map(row_to_booking).transpose()
    }

    async fn update(&self, booking: &Booking) -> Result<()> {
        // Unconditional overwrite, keyed by id. Upserts so an update to an
        // unknown id behaves like the original repository save().
        sqlx::query(
            r"
            INSERT INTO bookings (
                id, customer_id, landlord_id, parking_slot_id,
                price_per_hour, time_from, time_until, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                customer_id = EXCLUDED.customer_id,
                landlord_id = EXCLUDED.landlord_id,
                parking_slot_id = EXCLUDED.parking_slot_id,
                price_per_hour = EXCLUDED.price_per_hour,
                time_from = EXCLUDED.time_from,
                time_until = EXCLUDED.time_until,
                status = EXCLUDED.status
            ",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.customer_id.as_uuid())
        .bind(booking.landlord_id.as_uuid())
        .bind(booking.parking_slot_id.as_uuid())
        .bind(booking.price_per_hour.as_decimal())
        .bind(booking.window.from)
        .bind(booking.window.until)
        .bind(status_to_str(booking.status))
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to update booking", &e))?;
        Ok(())
    }

    async fn set_status(&self, id: BookingId, status: BookingStatus) -> Result<()> {
        let result = sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2")
            .bind(status_to_str(status))
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to update booking status", &e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Booking", id));
        }
        Ok(())
    }

    async fn delete(&self, id: BookingId) -> Result<()> {
        sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete booking", &e))?;
        Ok(())
    }

    async fn list_by_customer(&self, customer_id: UserId) -> Result<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r"
            SELECT id, customer_id, landlord_id, parking_slot_id,
                   price_per_hour, time_from, time_until, status, created_at
            FROM bookings WHERE customer_id = $1
            ",
        )
        .bind(customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to query bookings by customer", &e))?;

        rows.into_iter().map(row_to_booking).collect()
    }
}
