//! Booking service: persists bookings and orchestrates the payment /
//! slot-closure / event-publication saga for each new booking.

pub mod api;
pub mod config;
pub mod orchestrator;
pub mod routes;
pub mod state;

pub use config::Config;
pub use orchestrator::{BookingOrchestrator, BookingOutcome, NewBooking, PAYMENT_BREAKER};
pub use routes::build_router;
pub use state::AppState;
