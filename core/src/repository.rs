//! Repository traits owned by the domain.
//!
//! Each store (Postgres in production, in-memory in tests) implements these
//! traits; services depend on the trait objects only, never on a concrete
//! backend.

use crate::error::DomainError;
use crate::types::{
    Booking, BookingId, BookingStatus, Money, ParkingSlot, Payment, PaymentId, SlotId, SlotStatus,
    TransferOutcome, User, UserId,
};
use async_trait::async_trait;

/// Result alias for repository operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Page of entities plus the total row count.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// Zero-indexed page number requested
    pub page: usize,
    /// Page size requested
    pub page_size: usize,
    /// Total rows across all pages
    pub total: u64,
    /// The rows of this page
    pub items: Vec<T>,
}

/// Filter for parking-slot listings.
#[derive(Clone, Copy, Debug, Default)]
pub struct SlotFilter {
    /// Restrict to one occupancy state
    pub status: Option<SlotStatus>,
    /// Restrict to one landlord
    pub landlord_id: Option<UserId>,
}

/// Durable store of booking rows.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking.
    async fn insert(&self, booking: &Booking) -> Result<()>;

    /// Fetch a booking by id.
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>>;

    /// Unconditional overwrite by id.
    async fn update(&self, booking: &Booking) -> Result<()>;

    /// Move a booking to a new lifecycle state.
    async fn set_status(&self, id: BookingId, status: BookingStatus) -> Result<()>;

    /// Unconditional removal by id.
    async fn delete(&self, id: BookingId) -> Result<()>;

    /// All bookings made by one customer; order unspecified.
    async fn list_by_customer(&self, customer_id: UserId) -> Result<Vec<Booking>>;
}

/// Append-only payment ledger.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Append a ledger row. Rows are never updated afterwards.
    async fn append(&self, payment: &Payment) -> Result<()>;

    /// Fetch a ledger row by id.
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>>;

    /// All rows recorded for one booking, oldest first.
    async fn list_by_booking(&self, booking_id: BookingId) -> Result<Vec<Payment>>;
}

/// Durable store of user accounts and balances.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    async fn insert(&self, user: &User) -> Result<()>;

    /// Fetch a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Unconditional overwrite by id.
    async fn update(&self, user: &User) -> Result<()>;

    /// Unconditional removal by id.
    async fn delete(&self, id: UserId) -> Result<()>;

    /// One page of users, ordered by email.
    async fn list(&self, page: usize, page_size: usize) -> Result<Page<User>>;

    /// True when the email is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Current balance of one user.
    async fn balance_of(&self, id: UserId) -> Result<Option<Money>>;

    /// Administrative balance overwrite.
    async fn set_balance(&self, id: UserId, balance: Money) -> Result<()>;

    /// Atomic conditional transfer: debit `payer` and credit `receiver` in
    /// one transaction iff the payer balance covers `amount`. Both balances
    /// move together or not at all.
    async fn transfer(
        &self,
        payer: UserId,
        receiver: UserId,
        amount: Money,
    ) -> Result<TransferOutcome>;
}

/// Durable store of parking slots and their restrictions.
#[async_trait]
pub trait ParkingSlotRepository: Send + Sync {
    /// Persist a new slot.
    async fn insert(&self, slot: &ParkingSlot) -> Result<()>;

    /// Fetch a slot by id.
    async fn find_by_id(&self, id: SlotId) -> Result<Option<ParkingSlot>>;

    /// Unconditional overwrite by id.
    async fn update(&self, slot: &ParkingSlot) -> Result<()>;

    /// Unconditional removal by id.
    async fn delete(&self, id: SlotId) -> Result<()>;

    /// Slots matching the filter; order unspecified.
    async fn list(&self, filter: SlotFilter) -> Result<Vec<ParkingSlot>>;

    /// Move a slot to a new occupancy state.
    async fn set_status(&self, id: SlotId, status: SlotStatus) -> Result<()>;
}
