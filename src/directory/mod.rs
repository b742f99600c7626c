//! User directory collaborator
//!
//! Role-constrained user lookups and the category-interest query that
//! drives vendor matching at publish time.

pub mod memory;
pub mod postgres;

pub use memory::MemoryDirectory;
pub use postgres::PgUserDirectory;

use uuid::Uuid;

use crate::domain::{Category, UserProfile};

/// Errors that can occur in the user directory
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid profile data: {0}")]
    InvalidProfile(String),
}

/// Lookup interface over the user population.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, DirectoryError>;

    /// Vendors whose declared interest categories intersect `categories`.
    /// The result may contain vendors the matcher later rejects; final
    /// dedup and representative-category selection happen in the domain.
    async fn find_vendors_by_categories(
        &self,
        categories: &[Category],
    ) -> Result<Vec<UserProfile>, DirectoryError>;
}
