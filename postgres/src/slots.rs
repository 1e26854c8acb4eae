//! `PostgreSQL`-backed parking slot store.
//!
//! Restrictions are stored as JSONB on the slot row: they are always read
//! and written together with their slot, and never queried on their own.

use crate::storage_error;
use async_trait::async_trait;
use rust_decimal::Decimal;
use slotwise_core::repository::{ParkingSlotRepository, Result, SlotFilter};
use slotwise_core::{
    DomainError, Money, ParkingRestriction, ParkingSlot, SlotId, SlotStatus, UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

type SlotRow = (
    Uuid,                   // id
    Uuid,                   // landlord_id
    String,                 // status
    Decimal,                // price_per_hour
    sqlx::types::JsonValue, // restrictions
);

fn status_to_str(status: SlotStatus) -> &'static str {
    match status {
        SlotStatus::Open => "OPEN",
        SlotStatus::Closed => "CLOSED",
    }
}

fn status_from_str(s: &str) -> Result<SlotStatus> {
    match s {
        "OPEN" => Ok(SlotStatus::Open),
        "CLOSED" => Ok(SlotStatus::Closed),
        other => Err(DomainError::Storage(format!(
            "unknown slot status in database: {other}"
        ))),
    }
}

fn row_to_slot(row: SlotRow) -> Result<ParkingSlot> {
    let (id, landlord_id, status, price, restrictions) = row;
    let restrictions: Vec<ParkingRestriction> = serde_json::from_value(restrictions)
        .map_err(|e| DomainError::Storage(format!("Failed to decode restrictions: {e}")))?;
    Ok(ParkingSlot {
        id: SlotId::from_uuid(id),
        landlord_id: UserId::from_uuid(landlord_id),
        status: status_from_str(&status)?,
        price_per_hour: Money::from_decimal(price),
        restrictions,
    })
}

fn restrictions_json(slot: &ParkingSlot) -> Result<serde_json::Value> {
    serde_json::to_value(&slot.restrictions)
        .map_err(|e| DomainError::Storage(format!("Failed to encode restrictions: {e}")))
}

/// `PostgreSQL` implementation of [`ParkingSlotRepository`].
#[derive(Clone)]
pub struct PostgresParkingSlotStore {
    pool: PgPool,
}

impl PostgresParkingSlotStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the parking slots table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS parking_slots (
                id UUID PRIMARY KEY,
                landlord_id UUID NOT NULL,
                status TEXT NOT NULL,
                price_per_hour NUMERIC NOT NULL,
                restrictions JSONB NOT NULL DEFAULT '[]'
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to create parking slots schema", &e))?;

        for ddl in [
            "CREATE INDEX IF NOT EXISTS parking_slots_landlord_idx ON parking_slots (landlord_id)",
            "CREATE INDEX IF NOT EXISTS parking_slots_status_idx ON parking_slots (status)",
        ] {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to create parking slots index", &e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ParkingSlotRepository for PostgresParkingSlotStore {
    async fn insert(&self, slot: &ParkingSlot) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO parking_slots (id, landlord_id, status, price_per_hour, restrictions)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(slot.id.as_uuid())
        .bind(slot.landlord_id.as_uuid())
        .bind(status_to_str(slot.status))
        .bind(slot.price_per_hour.as_decimal())
        .bind(restrictions_json(slot)?)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to insert parking slot", &e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: SlotId) -> Result<Option<ParkingSlot>> {
        let row: Option<SlotRow> = sqlx::query_as(
            r"
            SELECT id, landlord_id, status, price_per_hour, restrictions
            FROM parking_slots WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to query parking slot", &e))?;

        row.map(row_to_slot).transpose()
    }

    async fn update(&self, slot: &ParkingSlot) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO parking_slots (id, landlord_id, status, price_per_hour, restrictions)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                landlord_id = EXCLUDED.landlord_id,
                status = EXCLUDED.status,
                price_per_hour = EXCLUDED.price_per_hour,
                restrictions = EXCLUDED.restrictions
            ",
        )
        .bind(slot.id.as_uuid())
        .bind(slot.landlord_id.as_uuid())
        .bind(status_to_str(slot.status))
        .bind(slot.price_per_hour.as_decimal())
        .bind(restrictions_json(slot)?)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to update parking slot", &e))?;
        Ok(())
    }

    async fn delete(&self, id: SlotId) -> Result<()> {
        sqlx::query("DELETE FROM parking_slots WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete parking slot", &e))?;
        Ok(())
    }

    async fn list(&self, filter: SlotFilter) -> Result<Vec<ParkingSlot>> {
        let rows: Vec<SlotRow> = sqlx::query_as(
            r"
            SELECT id, landlord_id, status, price_per_hour, restrictions
            FROM parking_slots
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::UUID IS NULL OR landlord_id = $2)
            ",
        )
        .bind(filter.status.map(status_to_str))
        .bind(filter.landlord_id.map(|id| *id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list parking slots", &e))?;

        rows.into_iter().map(row_to_slot).collect()
    }

    async fn set_status(&self, id: SlotId, status: SlotStatus) -> Result<()> {
        let result = sqlx::query("UPDATE parking_slots SET status = $1 WHERE id = $2")
            .bind(status_to_str(status))
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to update slot status", &e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("ParkingSlot", id));
        }
        Ok(())
    }
}
