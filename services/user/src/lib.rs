//! User service: account CRUD, balances, and the atomic two-party ledger
//! transfer the payment service settles charges through.

pub mod api;
pub mod config;
pub mod password;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::build_router;
pub use state::AppState;
