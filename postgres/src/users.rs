//! `PostgreSQL`-backed user store.
//!
//! Owns the atomic two-party transfer: the payer's conditional debit and
//! the landlord's credit run in one transaction, so concurrent payments
//! against the same account cannot interleave between read and write.

use crate::storage_error;
use async_trait::async_trait;
use rust_decimal::Decimal;
use slotwise_core::repository::{Page, Result, UserRepository};
use slotwise_core::{DomainError, Money, TransferOutcome, User, UserId, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

type UserRow = (
    Uuid,           // id
    String,         // email
    String,         // password_hash
    String,         // first_name
    String,         // last_name
    String,         // role
    Option<String>, // payment_method
    Decimal,        // balance
);

fn role_to_str(role: UserRole) -> &'static str {
    match role {
        UserRole::Customer => "CUSTOMER",
        UserRole::Landlord => "LANDLORD",
        UserRole::Admin => "ADMIN",
    }
}

fn role_from_str(s: &str) -> Result<UserRole> {
    match s {
        "CUSTOMER" => Ok(UserRole::Customer),
        "LANDLORD" => Ok(UserRole::Landlord),
        "ADMIN" => Ok(UserRole::Admin),
        other => Err(DomainError::Storage(format!(
            "unknown user role in database: {other}"
        ))),
    }
}

fn row_to_user(row: UserRow) -> Result<User> {
    let (id, email, password_hash, first_name, last_name, role, payment_method, balance) = row;
    Ok(User {
        id: UserId::from_uuid(id),
        email,
        password_hash,
        first_name,
        last_name,
        role: role_from_str(&role)?,
        payment_method,
        balance: Money::from_decimal(balance),
    })
}

/// `PostgreSQL` implementation of [`UserRepository`].
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the users table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                role TEXT NOT NULL,
                payment_method TEXT,
                balance NUMERIC NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to create users schema", &e))?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserStore {
    async fn insert(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r"
            INSERT INTO users (
                id, email, password_hash, first_name, last_name,
                role, payment_method, balance
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (email) DO NOTHING
            ",
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(role_to_str(user.role))
        .bind(&user.payment_method)
        .bind(user.balance.as_decimal())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to insert user", &e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EmailAlreadyExists(user.email.clone()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, password_hash, first_name, last_name,
                   role, payment_method, balance
            FROM users WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to query user", &e))?;

        row.map(row_to_user).transpose()
    }

    async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO users (
                id, email, password_hash, first_name, last_name,
                role, payment_method, balance
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                role = EXCLUDED.role,
                payment_method = EXCLUDED.payment_method,
                balance = EXCLUDED.balance
            ",
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(role_to_str(user.role))
        .bind(&user.payment_method)
        .bind(user.balance.as_decimal())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to update user", &e))?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete user", &e))?;
        Ok(())
    }

    async fn list(&self, page: usize, page_size: usize) -> Result<Page<User>> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to count users", &e))?;

        let rows: Vec<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, password_hash, first_name, last_name,
                   role, payment_method, balance
            FROM users
            ORDER BY email
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(i64::try_from(page_size).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.saturating_mul(page_size)).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list users", &e))?;

        let items: Result<Vec<User>> = rows.into_iter().map(row_to_user).collect();
        Ok(Page {
            page,
            page_size,
            total: u64::try_from(total.0).unwrap_or(0),
            items: items?,
        })
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to check email", &e))?;
        Ok(row.0)
    }

    async fn balance_of(&self, id: UserId) -> Result<Option<Money>> {
        let row: Option<(Decimal,)> = sqlx::query_as("SELECT balance FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to query balance", &e))?;
        Ok(row.map(|(balance,)| Money::from_decimal(balance)))
    }

    async fn set_balance(&self, id: UserId, balance: Money) -> Result<()> {
        let result = sqlx::query("UPDATE users SET balance = $1 WHERE id = $2")
            .bind(balance.as_decimal())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to update balance", &e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("User", id));
        }
        Ok(())
    }

    async fn transfer(
        &self,
        payer: UserId,
        receiver: UserId,
        amount: Money,
    ) -> Result<TransferOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to open transfer transaction", &e))?;

        // Conditional debit: only succeeds when the balance covers the
        // amount, which is the whole sufficiency check.
        let debited = sqlx::query(
            "UPDATE users SET balance = balance - $1 WHERE id = $2 AND balance >= $1",
        )
        .bind(amount.as_decimal())
        .bind(payer.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to debit payer", &e))?;

        if debited.rows_affected() == 0 {
            // Missing payer and insufficient balance both leave zero rows;
            // look the payer up to report the right outcome.
            let exists: (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                    .bind(payer.as_uuid())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| storage_error("Failed to check payer", &e))?;
            tx.rollback()
                .await
                .map_err(|e| storage_error("Failed to roll back transfer", &e))?;

            return if exists.0 {
                Ok(TransferOutcome::InsufficientFunds)
            } else {
                Err(DomainError::not_found("User", payer))
            };
        }

        let credited = sqlx::query("UPDATE users SET balance = balance + $1 WHERE id = $2")
            .bind(amount.as_decimal())
            .bind(receiver.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("Failed to credit receiver", &e))?;

        if credited.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| storage_error("Failed to roll back transfer", &e))?;
            return Err(DomainError::not_found("User", receiver));
        }

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit transfer", &e))?;

        tracing::info!(
            payer = %payer,
            receiver = %receiver,
            amount = %amount,
            "Transfer committed"
        );
        Ok(TransferOutcome::Completed)
    }
}
