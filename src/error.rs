//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::directory::DirectoryError;
use crate::domain::{DomainError, FieldError, ValidationErrors};
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Per-field validation failures; detected before any mutation
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    // Domain-state and not-found errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Missing required header: {0}")]
    MissingHeader(String),

    // Collaborator errors
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    // Server errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details, fields) = match &self {
            // 400 Bad Request
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_failed",
                None,
                Some(errors.errors.clone()),
            ),
            AppError::MissingHeader(header) => (
                StatusCode::BAD_REQUEST,
                "missing_header",
                Some(header.clone()),
                None,
            ),

            // 403 Forbidden
            AppError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone()), None)
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => {
                let code = match domain_err {
                    DomainError::AlreadyPublished => "already_published",
                    DomainError::NoDiscoveryDay => "no_discovery_day",
                    DomainError::RegistrationClosed { .. } => "registration_closed",
                    DomainError::DuplicateRegistration(_) => "duplicate_registration",
                    DomainError::RegistrationNotFound(_) => "registration_not_found",
                    DomainError::RfiNotFound(_) => "rfi_not_found",
                    DomainError::UserNotFound(_) => "user_not_found",
                };
                let status = match domain_err {
                    DomainError::AlreadyPublished | DomainError::DuplicateRegistration(_) => {
                        StatusCode::CONFLICT
                    }
                    DomainError::NoDiscoveryDay | DomainError::RegistrationClosed { .. } => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    DomainError::RegistrationNotFound(_)
                    | DomainError::RfiNotFound(_)
                    | DomainError::UserNotFound(_) => StatusCode::NOT_FOUND,
                };
                (status, code, Some(domain_err.to_string()), None)
            }

            // Store errors
            AppError::Store(StoreError::Conflict { .. }) => {
                (StatusCode::CONFLICT, "write_conflict", None, None)
            }
            AppError::Store(StoreError::AlreadyExists(id)) => (
                StatusCode::CONFLICT,
                "already_exists",
                Some(id.to_string()),
                None,
            ),
            AppError::Store(StoreError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                "rfi_not_found",
                Some(id.to_string()),
                None,
            ),
            AppError::Store(e) => {
                tracing::error!("Store error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error", None, None)
            }

            // 500 Internal Server Error
            AppError::Directory(e) => {
                tracing::error!("Directory error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "directory_error",
                    None,
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    None,
                    None,
                )
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_error",
                    None,
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
            fields,
        };

        (status, Json(body)).into_response()
    }
}
