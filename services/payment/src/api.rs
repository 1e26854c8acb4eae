//! Payment REST endpoints.
//!
//! - `POST /api/v1/make-payment` - settle the charge for a booking
//! - `POST /api/v1/payments/:id/refund` - compensating reversal
//! - `GET /api/v1/payments/:id` - ledger row lookup

use crate::processor::PaymentError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use slotwise_core::{BookingId, Money, Payment, PaymentId, PaymentStatus};
use slotwise_web::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to settle a booking.
#[derive(Debug, Deserialize)]
pub struct MakePaymentRequest {
    /// Booking to settle
    pub booking_id: Uuid,
}

/// Decision response for make-payment and refund.
#[derive(Debug, Serialize)]
pub struct PaymentDecisionResponse {
    /// Ledger row recorded for the decision
    pub payment_id: Uuid,
    /// Decision outcome
    pub status: PaymentStatus,
}

/// One ledger row on the wire.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Ledger row id
    pub id: Uuid,
    /// Debited party
    pub payer_id: Uuid,
    /// Credited party
    pub receiver_id: Uuid,
    /// Booking the charge was computed for
    pub booking_id: Uuid,
    /// When the decision was recorded
    pub recorded_at: DateTime<Utc>,
    /// Computed charge
    pub amount: Money,
    /// Decision outcome
    pub status: PaymentStatus,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            payer_id: *payment.payer_id.as_uuid(),
            receiver_id: *payment.receiver_id.as_uuid(),
            booking_id: *payment.booking_id.as_uuid(),
            recorded_at: payment.recorded_at,
            amount: payment.amount,
            status: payment.status,
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::BookingNotFound(id) => Self::not_found("Booking", id),
            PaymentError::PaymentNotFound(id) => Self::not_found("Payment", id),
            PaymentError::UserNotFound(message) => {
                Self::new(axum::http::StatusCode::NOT_FOUND, message, "NOT_FOUND".to_string())
            }
            PaymentError::Unavailable { .. } => {
                Self::unavailable_with_code(err.to_string(), "LEDGER_UNAVAILABLE")
            }
            PaymentError::NotRefundable(_) | PaymentError::RefundNotCoverable(_) => {
                Self::conflict(err.to_string())
            }
            PaymentError::ChargeOverflow(_) => Self::validation(err.to_string()),
            PaymentError::Storage(e) => e.into(),
        }
    }
}

/// Settle the charge for one booking and record the decision.
pub async fn make_payment(
    State(state): State<AppState>,
    Json(request): Json<MakePaymentRequest>,
) -> Result<Json<PaymentDecisionResponse>, AppError> {
    let payment = state
        .processor
        .make_payment(BookingId::from_uuid(request.booking_id))
        .await?;
    Ok(Json(PaymentDecisionResponse {
        payment_id: *payment.id.as_uuid(),
        status: payment.status,
    }))
}

/// Reverse an earlier completed payment.
pub async fn refund_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentDecisionResponse>, AppError> {
    let refund = state.processor.refund(PaymentId::from_uuid(id)).await?;
    Ok(Json(PaymentDecisionResponse {
        payment_id: *refund.id.as_uuid(),
        status: refund.status,
    }))
}

/// Fetch one ledger row.
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, AppError> {
    let payment = state.processor.payment(PaymentId::from_uuid(id)).await?;
    Ok(Json(payment.into()))
}
