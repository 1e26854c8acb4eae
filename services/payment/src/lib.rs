//! Payment service: computes booking charges, settles them as atomic
//! transfers on the user store, and keeps the append-only payment ledger.

pub mod api;
pub mod config;
pub mod processor;
pub mod routes;
pub mod state;

pub use config::Config;
pub use processor::{PaymentError, PaymentProcessor, LEDGER_BREAKER};
pub use routes::build_router;
pub use state::AppState;
