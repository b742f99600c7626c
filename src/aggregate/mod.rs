//! Aggregate module
//!
//! The RFI aggregate root: an append-only sequence of versions plus the
//! discovery day registration set.

pub mod rfi;

pub use rfi::RfiAggregate;
