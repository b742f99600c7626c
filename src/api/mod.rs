//! API module
//!
//! HTTP layer: routes and middleware.

pub mod middleware;
pub mod routes;

pub use routes::{create_router, AppState};
