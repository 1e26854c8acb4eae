//! In-memory doubles for the cross-service client traits.
//!
//! Mirrors the production/mock split of the HTTP clients: services depend
//! on the traits from `slotwise-clients`, so tests can script downstream
//! behavior (complete, decline, go dark) without a network.

use async_trait::async_trait;
use slotwise_clients::{
    BookingDirectory, ClientError, PaymentDecision, PaymentGateway, SlotGateway, UserLedger,
};
use slotwise_core::{
    Booking, BookingId, Money, ParkingSlot, PaymentId, SlotId, SlotStatus, TransferOutcome, UserId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};

/// [`BookingDirectory`] over a fixed set of bookings.
#[derive(Debug, Default)]
pub struct StaticBookings {
    bookings: RwLock<HashMap<BookingId, Booking>>,
    unavailable: AtomicBool,
}

impl StaticBookings {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a booking the directory will answer with.
    pub async fn insert(&self, booking: Booking) {
        self.bookings.write().await.insert(booking.id, booking);
    }

    /// Make every subsequent lookup fail as unavailable.
    pub fn go_dark(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookingDirectory for StaticBookings {
    async fn booking(&self, id: BookingId) -> Result<Booking, ClientError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Unavailable {
                service: "booking-service",
                reason: "scripted outage".to_string(),
            });
        }
        self.bookings
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                resource: "Booking",
                id: id.to_string(),
            })
    }
}

/// [`UserLedger`] over an in-memory balance table.
///
/// The conditional transfer runs under one lock, like the SQL transaction
/// it stands in for.
#[derive(Debug, Default)]
pub struct InMemoryUserLedger {
    balances: RwLock<HashMap<UserId, Money>>,
    unavailable: AtomicBool,
}

impl InMemoryUserLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one balance.
    pub async fn seed(&self, user: UserId, balance: Money) {
        self.balances.write().await.insert(user, balance);
    }

    /// Make every subsequent call fail as unavailable.
    pub fn go_dark(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), ClientError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Unavailable {
                service: "user-service",
                reason: "scripted outage".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserLedger for InMemoryUserLedger {
    async fn balance_of(&self, user: UserId) -> Result<Money, ClientError> {
        self.check_available()?;
        self.balances
            .read()
            .await
            .get(&user)
            .copied()
            .ok_or_else(|| ClientError::NotFound {
                resource: "User",
                id: user.to_string(),
            })
    }

    async fn set_balance(&self, user: UserId, balance: Money) -> Result<(), ClientError> {
        self.check_available()?;
        self.balances.write().await.insert(user, balance);
        Ok(())
    }

    async fn transfer(
        &self,
        payer: UserId,
        receiver: UserId,
        amount: Money,
    ) -> Result<TransferOutcome, ClientError> {
        self.check_available()?;
        let mut balances = self.balances.write().await;

        let payer_balance =
            balances
                .get(&payer)
                .copied()
                .ok_or_else(|| ClientError::NotFound {
                    resource: "User",
                    id: payer.to_string(),
                })?;
        let receiver_balance =
            balances
                .get(&receiver)
                .copied()
                .ok_or_else(|| ClientError::NotFound {
                    resource: "User",
                    id: receiver.to_string(),
                })?;

        if payer_balance < amount {
            return Ok(TransferOutcome::InsufficientFunds);
        }

        let debited = payer_balance.checked_sub(amount).ok_or_else(|| {
            ClientError::InvalidResponse {
                service: "user-service",
                reason: "balance underflow".to_string(),
            }
        })?;
        let credited = receiver_balance.checked_add(amount).ok_or_else(|| {
            ClientError::InvalidResponse {
                service: "user-service",
                reason: "balance overflow".to_string(),
            }
        })?;

        balances.insert(payer, debited);
        balances.insert(receiver, credited);
        Ok(TransferOutcome::Completed)
    }
}

/// [`SlotGateway`] that records status changes.
#[derive(Debug, Default)]
pub struct RecordingSlotGateway {
    open_slots: RwLock<Vec<ParkingSlot>>,
    status_changes: Mutex<Vec<(SlotId, SlotStatus)>>,
    unavailable: AtomicBool,
}

impl RecordingSlotGateway {
    /// Creates a gateway with no open slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the open slots `list_open` answers with.
    pub async fn set_open_slots(&self, slots: Vec<ParkingSlot>) {
        *self.open_slots.write().await = slots;
    }

    /// Every status change requested so far.
    pub async fn status_changes(&self) -> Vec<(SlotId, SlotStatus)> {
        self.status_changes.lock().await.clone()
    }

    /// Make every subsequent call fail as unavailable.
    pub fn go_dark(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SlotGateway for RecordingSlotGateway {
    async fn set_status(&self, slot: SlotId, status: SlotStatus) -> Result<(), ClientError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Unavailable {
                service: "parking-service",
                reason: "scripted outage".to_string(),
            });
        }
        self.status_changes.lock().await.push((slot, status));
        Ok(())
    }

    async fn list_open(&self) -> Result<Vec<ParkingSlot>, ClientError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Unavailable {
                service: "parking-service",
                reason: "scripted outage".to_string(),
            });
        }
        Ok(self.open_slots.read().await.clone())
    }
}

/// Scripted behavior for [`ScriptedPaymentGateway`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentScript {
    /// Every request completes
    Complete,
    /// Every request is declined
    Decline,
    /// Every request fails as unavailable
    Unavailable,
}

/// [`PaymentGateway`] double with scripted outcomes and recorded refunds.
#[derive(Debug)]
pub struct ScriptedPaymentGateway {
    script: RwLock<PaymentScript>,
    payment_id: PaymentId,
    requests: Mutex<Vec<BookingId>>,
    refunds: Mutex<Vec<PaymentId>>,
}

impl ScriptedPaymentGateway {
    /// Creates a gateway following the given script.
    #[must_use]
    pub fn new(script: PaymentScript) -> Self {
        Self {
            script: RwLock::new(script),
            payment_id: PaymentId::new(),
            requests: Mutex::new(Vec::new()),
            refunds: Mutex::new(Vec::new()),
        }
    }

    /// The payment id completed requests answer with.
    #[must_use]
    pub const fn payment_id(&self) -> PaymentId {
        self.payment_id
    }

    /// Change the script mid-test.
    pub async fn set_script(&self, script: PaymentScript) {
        *self.script.write().await = script;
    }

    /// Bookings a payment was requested for.
    pub async fn requests(&self) -> Vec<BookingId> {
        self.requests.lock().await.clone()
    }

    /// Payments refunded so far.
    pub async fn refunds(&self) -> Vec<PaymentId> {
        self.refunds.lock().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedPaymentGateway {
    async fn request_payment(&self, booking: BookingId) -> Result<PaymentDecision, ClientError> {
        self.requests.lock().await.push(booking);
        match *self.script.read().await {
            PaymentScript::Complete => Ok(PaymentDecision::Completed {
                payment_id: self.payment_id,
            }),
            PaymentScript::Decline => Ok(PaymentDecision::Declined),
            PaymentScript::Unavailable => Err(ClientError::Unavailable {
                service: "payment-service",
                reason: "scripted outage".to_string(),
            }),
        }
    }

    async fn refund(&self, payment: PaymentId) -> Result<(), ClientError> {
        self.refunds.lock().await.push(payment);
        Ok(())
    }
}
