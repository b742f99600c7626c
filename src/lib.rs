//! rfi_concierge Library
//!
//! Re-exports modules for integration testing and external use.

pub mod aggregate;
pub mod api;
pub mod directory;
pub mod domain;
pub mod handlers;
pub mod notify;
pub mod store;

// Used by main.rs and operational tooling.
pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{DomainError, OperationContext, RfiStatus, ValidationErrors};
