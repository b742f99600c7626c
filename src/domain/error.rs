//! Domain error types
//!
//! Pure domain errors independent of the web and persistence layers.

use thiserror::Error;
use uuid::Uuid;

/// A single structured field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulates per-field validation failures so a caller sees every problem
/// in one response rather than one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the accumulator; `Err` if anything was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Business rule violations and lifecycle-state failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Publish invoked on an aggregate that is already published
    #[error("RFI is already published")]
    AlreadyPublished,

    /// Registration operation against a version with no discovery day
    #[error("RFI has no discovery day session")]
    NoDiscoveryDay,

    /// Registration operation after the session has occurred
    #[error("Registration closed: session occurred at {occurring_at}")]
    RegistrationClosed {
        occurring_at: chrono::DateTime<chrono::Utc>,
    },

    /// A vendor may hold at most one registration per RFI
    #[error("Vendor {0} already has a registration for this RFI")]
    DuplicateRegistration(Uuid),

    /// No registration exists for the vendor
    #[error("No registration found for vendor {0}")]
    RegistrationNotFound(Uuid),

    /// Aggregate does not exist
    #[error("RFI not found: {0}")]
    RfiNotFound(Uuid),

    /// Referenced user does not exist
    #[error("User not found: {0}")]
    UserNotFound(Uuid),
}

impl DomainError {
    /// Check if this is a lifecycle-state conflict rather than a missing
    /// entity.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::AlreadyPublished
                | Self::NoDiscoveryDay
                | Self::RegistrationClosed { .. }
                | Self::DuplicateRegistration(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RfiNotFound(_) | Self::UserNotFound(_) | Self::RegistrationNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_accumulate() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("title", "must not be empty");
        errors.add("categories", "must contain at least one value");

        let err = errors.into_result().unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert_eq!(err.errors[0].field, "title");
        assert!(err.to_string().contains("categories"));
    }

    #[test]
    fn test_empty_validation_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_error_classification() {
        assert!(DomainError::AlreadyPublished.is_state_error());
        assert!(!DomainError::AlreadyPublished.is_not_found());

        let not_found = DomainError::RfiNotFound(Uuid::new_v4());
        assert!(not_found.is_not_found());
        assert!(!not_found.is_state_error());
    }
}
