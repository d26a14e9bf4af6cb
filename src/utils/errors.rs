//! Error handling for the SK portal
//!
//! This module defines the main error type used throughout the application
//! and maps every variant onto the HTTP status the API reports.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

/// Main error type for the portal
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Published event not found: {publish_event_id}")]
    PublishedEventNotFound { publish_event_id: i64 },

    #[error("Profile not found for account {account_id}, complete your profile first")]
    ProfileNotFound { account_id: i64 },

    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: i64 },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Event {event_id} has already been published")]
    AlreadyPublished { event_id: i64 },

    #[error("Account {account_id} is already registered for event {publish_event_id}")]
    AlreadyRegistered { publish_event_id: i64, account_id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not eligible: {0}")]
    NotEligible(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for PortalError {
    fn from(value: config::ConfigError) -> Self {
        PortalError::Config(value.to_string())
    }
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

impl PortalError {
    /// HTTP status reported to the client
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PortalError::AlreadyPublished { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PortalError::EventNotFound { .. }
            | PortalError::PublishedEventNotFound { .. }
            | PortalError::ProfileNotFound { .. }
            | PortalError::AccountNotFound { .. }
            | PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::AlreadyRegistered { .. } | PortalError::Conflict(_) => StatusCode::CONFLICT,
            PortalError::NotEligible(_) | PortalError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            PortalError::Authentication(_) | PortalError::Token(_) => StatusCode::UNAUTHORIZED,
            PortalError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            PortalError::Database(_)
            | PortalError::Migration(_)
            | PortalError::Config(_)
            | PortalError::Serialization(_)
            | PortalError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PortalError::Database(_) => ErrorSeverity::Critical,
            PortalError::Migration(_) => ErrorSeverity::Critical,
            PortalError::Config(_) => ErrorSeverity::Critical,
            PortalError::Serialization(_) | PortalError::Io(_) => ErrorSeverity::Error,
            PortalError::PermissionDenied(_) => ErrorSeverity::Warning,
            PortalError::Authentication(_) | PortalError::Token(_) => ErrorSeverity::Warning,
            PortalError::RateLimitExceeded => ErrorSeverity::Warning,
            _ => ErrorSeverity::Info,
        }
    }

    /// Message safe to show to the client. Infrastructure details stay in the logs.
    pub fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => "internal server error".to_string(),
            StatusCode::UNAUTHORIZED => "authentication required".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                error!(error = %self, severity = %self.severity(), "Request failed")
            }
            ErrorSeverity::Warning => warn!(error = %self, "Request rejected"),
            ErrorSeverity::Info => info!(error = %self, "Request rejected"),
        }

        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// True when a database error is a unique-constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        assert_eq!(
            PortalError::InvalidInput("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            PortalError::AlreadyRegistered { publish_event_id: 1, account_id: 2 }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            PortalError::AlreadyPublished { event_id: 3 }.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            PortalError::NotEligible("no tag matched".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            PortalError::ProfileNotFound { account_id: 9 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PortalError::Authentication("missing token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn infrastructure_errors_hide_details() {
        let err = PortalError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal server error");
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
