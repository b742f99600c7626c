//! Operation context
//!
//! Metadata about the current operation for audit-style logging and tracing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for an operation, threaded from the HTTP layer into handlers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationContext {
    /// User ID from the X-Request-User-Id header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acting_user: Option<Uuid>,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_acting_user(mut self, user_id: Uuid) -> Self {
        self.acting_user = Some(user_id);
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }
}
