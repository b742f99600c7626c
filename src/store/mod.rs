//! Document store collaborator
//!
//! The core persists each RFI aggregate as one opaque document. The store
//! is the sole serialization point for aggregate mutations: updates are
//! compared-and-swapped on the aggregate's sequence number, so at most one
//! concurrent writer succeeds.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

use uuid::Uuid;

use crate::aggregate::RfiAggregate;

/// Errors that can occur in the document store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Optimistic concurrency conflict
    #[error("Write conflict for RFI {id}: expected seq {expected}, found {found}")]
    Conflict { id: Uuid, expected: i64, found: i64 },

    /// Insert for an ID that already exists
    #[error("RFI already exists: {0}")]
    AlreadyExists(Uuid),

    /// Update for an ID with no stored document
    #[error("RFI not found: {0}")]
    NotFound(Uuid),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Check if this error is a concurrency conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Durable persistence for RFI aggregates.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a brand-new aggregate.
    async fn insert(&self, rfi: &RfiAggregate) -> Result<(), StoreError>;

    /// Persist a mutated aggregate. The write succeeds only if the stored
    /// sequence number still equals `rfi.seq()`; the stored document gets
    /// the next sequence number.
    async fn update(&self, rfi: &RfiAggregate) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RfiAggregate>, StoreError>;

    /// All aggregates, oldest first.
    async fn list(&self) -> Result<Vec<RfiAggregate>, StoreError>;
}
