//! In-memory repository implementations.
//!
//! Same observable semantics as the `slotwise-postgres` implementations —
//! including the conditional atomic transfer — so service logic can be
//! exercised at memory speed. A mutex guards each map; "atomic" here means
//! the whole transfer happens under one lock acquisition, mirroring the SQL
//! transaction boundary.

use async_trait::async_trait;
use slotwise_core::repository::{
    BookingRepository, Page, ParkingSlotRepository, PaymentRepository, Result, SlotFilter,
    UserRepository,
};
use slotwise_core::{
    Booking, BookingId, BookingStatus, DomainError, Money, ParkingSlot, Payment, PaymentId,
    SlotId, SlotStatus, TransferOutcome, User, UserId,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory [`BookingRepository`].
#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<BookingId, Booking>>,
}

impl InMemoryBookingRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn update(&self, booking: &Booking) -> Result<()> {
        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn set_status(&self, id: BookingId, status: BookingStatus) -> Result<()> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Booking", id))?;
        booking.status = status;
        Ok(())
    }

    async fn delete(&self, id: BookingId) -> Result<()> {
        self.bookings.write().await.remove(&id);
        Ok(())
    }

    async fn list_by_customer(&self, customer_id: UserId) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.customer_id == customer_id)
            .cloned()
            .collect())
    }
}

/// In-memory append-only [`PaymentRepository`].
#[derive(Debug, Default)]
pub struct InMemoryPaymentRepository {
    payments: RwLock<Vec<Payment>>,
}

impl InMemoryPaymentRepository {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row appended so far, in order.
    pub async fn all(&self) -> Vec<Payment> {
        self.payments.read().await.clone()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn append(&self, payment: &Payment) -> Result<()> {
        self.payments.write().await.push(payment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>> {
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_by_booking(&self, booking_id: BookingId) -> Result<Vec<Payment>> {
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .filter(|p| p.booking_id == booking_id)
            .cloned()
            .collect())
    }
}

/// In-memory [`UserRepository`] with the conditional atomic transfer.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user, returning its id for convenience.
    pub async fn seed(&self, user: User) -> UserId {
        let id = user.id;
        self.users.write().await.insert(id, user);
        id
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists(user.email.clone()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        self.users.write().await.remove(&id);
        Ok(())
    }

    async fn list(&self, page: usize, page_size: usize) -> Result<Page<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.email.cmp(&b.email));
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .collect();
        Ok(Page {
            page,
            page_size,
            total,
            items,
        })
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.users.read().await.values().any(|u| u.email == email))
    }

    async fn balance_of(&self, id: UserId) -> Result<Option<Money>> {
        Ok(self.users.read().await.get(&id).map(|u| u.balance))
    }

    async fn set_balance(&self, id: UserId, balance: Money) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("User", id))?;
        user.balance = balance;
        Ok(())
    }

    async fn transfer(
        &self,
        payer: UserId,
        receiver: UserId,
        amount: Money,
    ) -> Result<TransferOutcome> {
        // One lock acquisition covers the check and both writes, matching
        // the single SQL transaction of the Postgres implementation.
        let mut users = self.users.write().await;

        let payer_balance = users
            .get(&payer)
            .map(|u| u.balance)
            .ok_or_else(|| DomainError::not_found("User", payer))?;
        let receiver_balance = users
            .get(&receiver)
            .map(|u| u.balance)
            .ok_or_else(|| DomainError::not_found("User", receiver))?;

        if payer_balance < amount {
            return Ok(TransferOutcome::InsufficientFunds);
        }

        let debited = payer_balance
            .checked_sub(amount)
            .ok_or_else(|| DomainError::Storage("balance underflow".to_string()))?;
        let credited = receiver_balance
            .checked_add(amount)
            .ok_or_else(|| DomainError::Storage("balance overflow".to_string()))?;

        if let Some(user) = users.get_mut(&payer) {
            user.balance = debited;
        }
        if let Some(user) = users.get_mut(&receiver) {
            user.balance = credited;
        }
        Ok(TransferOutcome::Completed)
    }
}

/// In-memory [`ParkingSlotRepository`].
#[derive(Debug, Default)]
pub struct InMemoryParkingSlotRepository {
    slots: RwLock<HashMap<SlotId, ParkingSlot>>,
}

impl InMemoryParkingSlotRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParkingSlotRepository for InMemoryParkingSlotRepository {
    async fn insert(&self, slot: &ParkingSlot) -> Result<()> {
        self.slots.write().await.insert(slot.id, slot.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: SlotId) -> Result<Option<ParkingSlot>> {
        Ok(self.slots.read().await.get(&id).cloned())
    }

    async fn update(&self, slot: &ParkingSlot) -> Result<()> {
        self.slots.write().await.insert(slot.id, slot.clone());
        Ok(())
    }

    async fn delete(&self, id: SlotId) -> Result<()> {
        self.slots.write().await.remove(&id);
        Ok(())
    }

    async fn list(&self, filter: SlotFilter) -> Result<Vec<ParkingSlot>> {
        Ok(self
            .slots
            .read()
            .await
            .values()
            .filter(|s| filter.status.map_or(true, |status| s.status == status))
            .filter(|s| filter.landlord_id.map_or(true, |id| s.landlord_id == id))
            .cloned()
            .collect())
    }

    async fn set_status(&self, id: SlotId, status: SlotStatus) -> Result<()> {
        let mut slots = self.slots.write().await;
        let slot = slots
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("ParkingSlot", id))?;
        slot.status = status;
        Ok(())
    }
}
