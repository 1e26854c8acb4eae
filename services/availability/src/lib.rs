//! Availability service: searches the parking service's open slots and
//! filters them against car-category restrictions.

pub mod api;
pub mod config;
pub mod routes;
pub mod search;
pub mod state;

pub use config::Config;
pub use routes::build_router;
pub use search::{available_slots, AvailabilityQuery};
pub use state::AppState;
