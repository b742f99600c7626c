//! Command Handlers module
//!
//! Command handlers that orchestrate business operations. Each handler
//! coordinates the aggregate, document store, user directory, and
//! notification dispatcher.

mod commands;
mod publish_handler;
mod registration_handler;
mod rfi_handler;
mod validate;

pub use commands::*;
pub use publish_handler::PublishRfiHandler;
pub use registration_handler::RegistrationHandler;
pub use rfi_handler::{CreateRfiHandler, EditRfiHandler};
