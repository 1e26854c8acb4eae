//! Parking service: slot CRUD with embedded restrictions and the status
//! endpoint the booking orchestrator closes slots through.

pub mod api;
pub mod config;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::build_router;
pub use state::AppState;
