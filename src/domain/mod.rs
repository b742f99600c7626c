//! Domain module
//!
//! Core domain types and business logic.

pub mod addenda;
pub mod context;
pub mod discovery_day;
pub mod error;
pub mod matching;
pub mod rfi;
pub mod status;
pub mod user;

pub use addenda::{reconcile, DELETION_SENTINEL};
pub use context::OperationContext;
pub use discovery_day::{classify, select_impacted, DiscoveryDayChange};
pub use error::{DomainError, FieldError, ValidationErrors};
pub use matching::{match_vendors, VendorMatch};
pub use rfi::{
    Addendum, Attendee, Category, DiscoveryDay, Registration, UnknownCategory, Version,
};
pub use status::{derive_status, RfiStatus};
pub use user::{UserKind, UserProfile};
