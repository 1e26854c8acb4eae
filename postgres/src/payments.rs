//! `PostgreSQL`-backed payment ledger.

use crate::storage_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use slotwise_core::repository::{PaymentRepository, Result};
use slotwise_core::{BookingId, DomainError, Money, Payment, PaymentId, PaymentStatus, UserId};
use sqlx::PgPool;
use uuid::Uuid;

type PaymentRow = (
    Uuid,           // id
    Uuid,           // payer_id
    Uuid,           // receiver_id
    Uuid,           // booking_id
    DateTime<Utc>,  // recorded_at
    Decimal,        // amount
    String,         // status
);

fn status_to_str(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Completed => "COMPLETED",
        PaymentStatus::Declined => "DECLINED",
        PaymentStatus::Refunded => "REFUNDED",
    }
}

fn status_from_str(s: &str) -> Result<PaymentStatus> {
    match s {
        "COMPLETED" => Ok(PaymentStatus::Completed),
        "DECLINED" => Ok(PaymentStatus::Declined),
        "REFUNDED" => Ok(PaymentStatus::Refunded),
        other => Err(DomainError::Storage(format!(
            "unknown payment status in database: {other}"
        ))),
    }
}

fn row_to_payment(row: PaymentRow) -> Result<Payment> {
    let (id, payer_id, receiver_id, booking_id, recorded_at, amount, status) = row;
    Ok(Payment {
        id: PaymentId::from_uuid(id),
        payer_id: UserId::from_uuid(payer_id),
        receiver_id: UserId::from_uuid(receiver_id),
        booking_id: BookingId::from_uuid(booking_id),
        recorded_at,
        amount: Money::from_decimal(amount),
        status: status_from_str(&status)?,
    })
}

/// `PostgreSQL` implementation of [`PaymentRepository`].
///
/// The table is append-only: rows are inserted, never updated or deleted.
#[derive(Clone)]
pub struct PostgresPaymentStore {
    pool: PgPool,
}

impl PostgresPaymentStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the payments table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS payments (
                id UUID PRIMARY KEY,
                payer_id UUID NOT NULL,
                receiver_id UUID NOT NULL,
                booking_id UUID NOT NULL,
                recorded_at TIMESTAMPTZ NOT NULL,
                amount NUMERIC NOT NULL,
                status TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to create payments schema", &e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS payments_booking_idx ON payments (booking_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to create payments index", &e))?;
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentStore {
    async fn append(&self, payment: &Payment) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO payments (
                id, payer_id, receiver_id, booking_id, recorded_at, amount, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(payment.id.as_uuid())
        .bind(payment.payer_id.as_uuid())
        .bind(payment.receiver_id.as_uuid())
        .bind(payment.booking_id.as_uuid())
        .bind(payment.recorded_at)
        .bind(payment.amount.as_decimal())
        .bind(status_to_str(payment.status))
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to append payment", &e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r"
            SELECT id, payer_id, receiver_id, booking_id, recorded_at, amount, status
            FROM payments WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to query payment", &e))?;

        row.map(row_to_payment).transpose()
    }

    async fn list_by_booking(&self, booking_id: BookingId) -> Result<Vec<Payment>> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r"
            SELECT id, payer_id, receiver_id, booking_id, recorded_at, amount, status
            FROM payments WHERE booking_id = $1
            ORDER BY recorded_at ASC
            ",
        )
        .bind(booking_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to query payments by booking", &e))?;

        rows.into_iter().map(row_to_payment).collect()
    }
}
