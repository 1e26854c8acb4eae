//! User REST endpoints.
//!
//! - `POST /api/v1/users` - create (duplicate email -> 409)
//! - `GET /api/v1/users` - paginated listing
//! - `GET/PUT/DELETE /api/v1/users/:id` - fetch / overwrite / remove
//! - `GET/PUT /api/v1/users/:id/balance` - balance read / administrative
//!   overwrite
//! - `POST /api/v1/users/transfer` - atomic conditional transfer between
//!   two users

use crate::password::hash_password;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use slotwise_core::{Money, TransferOutcome, User, UserId, UserRole};
use slotwise_web::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create or overwrite a user.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    /// Unique email address
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Account role
    pub role: UserRole,
    /// Free-form payment method label
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Starting balance; defaults to zero
    #[serde(default)]
    pub balance: Option<Money>,
}

/// Response after creating a user.
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    /// Created user ID
    pub user_id: Uuid,
}

/// One user on the wire. The password hash never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,
    /// Email address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Account role
    pub role: UserRole,
    /// Free-form payment method label
    pub payment_method: Option<String>,
    /// Current balance
    pub balance: Money,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            payment_method: user.payment_method,
            balance: user.balance,
        }
    }
}

/// Query parameters for listing users.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Page number (0-indexed)
    #[serde(default)]
    pub page: usize,
    /// Page size (default: 20, max: 100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

const fn default_page_size() -> usize {
    20
}

/// Paginated listing response.
#[derive(Debug, Serialize)]
pub struct PaginatedUsersResponse {
    /// Page number requested
    pub page: usize,
    /// Page size requested
    pub page_size: usize,
    /// Total users across all pages
    pub total: u64,
    /// The users of this page
    pub data: Vec<UserResponse>,
}

/// Request for an atomic transfer between two users.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Debited party
    pub payer_id: Uuid,
    /// Credited party
    pub receiver_id: Uuid,
    /// Amount to move
    pub amount: Money,
}

/// Transfer outcome response.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Outcome of the conditional transfer
    pub status: TransferOutcome,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a user. A duplicate email answers `409 CONFLICT`.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<UserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    if request.email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }

    let user = User {
        id: UserId::new(),
        email: request.email,
        password_hash: hash_password(&request.password),
        first_name: request.first_name,
        last_name: request.last_name,
        role: request.role,
        payment_method: request.payment_method,
        balance: request.balance.unwrap_or_else(Money::zero),
    };
    state.users.insert(&user).await?;
    tracing::info!(user_id = %user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            user_id: *user.id.as_uuid(),
        }),
    ))
}

/// Fetch one user by id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user_id = UserId::from_uuid(id);
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user_id))?;
    Ok(Json(user.into()))
}

/// One page of users, ordered by email.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let page_size = query.page_size.min(100);
    let page = state.users.list(query.page, page_size).await?;
    Ok(Json(PaginatedUsersResponse {
        page: page.page,
        page_size: page.page_size,
        total: page.total,
        data: page.items.into_iter().map(Into::into).collect(),
    }))
}

/// Unconditional overwrite by id.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UserRequest>,
) -> Result<StatusCode, AppError> {
    let user_id = UserId::from_uuid(id);
    let existing = state.users.find_by_id(user_id).await?;
    let balance = request
        .balance
        .or_else(|| existing.map(|u| u.balance))
        .unwrap_or_else(Money::zero);

    let user = User {
        id: user_id,
        email: request.email,
        password_hash: hash_password(&request.password),
        first_name: request.first_name,
        last_name: request.last_name,
        role: request.role,
        payment_method: request.payment_method,
        balance,
    };
    state.users.update(&user).await?;
    tracing::info!(user_id = %user_id, "User updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Unconditional removal by id.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user_id = UserId::from_uuid(id);
    state.users.delete(user_id).await?;
    tracing::info!(user_id = %user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Current balance as a decimal string.
pub async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Money>, AppError> {
    let user_id = UserId::from_uuid(id);
    let balance = state
        .users
        .balance_of(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user_id))?;
    Ok(Json(balance))
}

/// Administrative balance overwrite. No response body.
pub async fn put_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(balance): Json<Money>,
) -> Result<StatusCode, AppError> {
    if balance.is_negative() {
        return Err(AppError::validation("Balance must not be negative"));
    }
    state
        .users
        .set_balance(UserId::from_uuid(id), balance)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Atomic conditional transfer: debit iff the payer balance covers the
/// amount, credit the receiver in the same transaction. Both balances move
/// together or not at all.
pub async fn transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    if request.amount.is_negative() {
        return Err(AppError::validation("Transfer amount must not be negative"));
    }

    let status = state
        .users
        .transfer(
            UserId::from_uuid(request.payer_id),
            UserId::from_uuid(request.receiver_id),
            request.amount,
        )
        .await?;

    tracing::info!(
        payer = %request.payer_id,
        receiver = %request.receiver_id,
        amount = %request.amount,
        outcome = ?status,
        "Transfer processed"
    );
    Ok(Json(TransferResponse { status }))
}
