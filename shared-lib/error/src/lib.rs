//! Common error types for the blog backend.
//!
//! This crate provides unified error handling across the services and the
//! HTTP gateway. Status codes are carried as plain `u16` so the crate stays
//! free of any HTTP framework.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> u16 {
        match self {
            AppError::Auth(err) => err.status(),
            AppError::Database(DatabaseError::NotFound) => 404,
            AppError::Database(DatabaseError::DuplicateEntry(_)) => 409,
            AppError::Database(_) => 500,
            AppError::Validation(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::Internal(_) => 500,
        }
    }
}

/// Authentication-related errors.
///
/// The token variants keep the precise reason a token was rejected so it can
/// be logged; clients only ever see [`AuthError::public_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing authorization header")]
    MissingCredentials,

    #[error("Malformed authorization header")]
    MalformedAuthorization,

    #[error("Malformed base64url segment")]
    MalformedEncoding,

    #[error("Invalid token format")]
    InvalidFormat,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Invalid claims encoding")]
    InvalidClaimsEncoding,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token creation failed")]
    TokenCreationFailed,

    #[error("Signing key is not configured")]
    MissingSigningKey,

    #[error("Forbidden")]
    Forbidden,
}

impl AuthError {
    /// Whether this error stems from a presented token failing verification.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedEncoding
                | AuthError::InvalidFormat
                | AuthError::InvalidSignature
                | AuthError::InvalidClaimsEncoding
                | AuthError::TokenExpired
        )
    }

    /// HTTP status this error is reported with.
    pub fn status(&self) -> u16 {
        match self {
            AuthError::Forbidden => 403,
            AuthError::TokenCreationFailed | AuthError::MissingSigningKey => 500,
            _ => 401,
        }
    }

    /// Message sent to clients. Every token verification failure collapses
    /// to the same text.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid username or password",
            AuthError::MissingCredentials => "no authentication",
            AuthError::MalformedAuthorization => "malformed authentication format",
            AuthError::Forbidden => "insufficient access",
            AuthError::TokenCreationFailed | AuthError::MissingSigningKey => {
                "authentication is unavailable"
            }
            _ => "token expired",
        }
    }
}

/// Database-related errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// Error body returned to API clients: `{"status":401,"message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status, repeated in the body
    pub status: u16,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        Self::new(err.status(), err.public_message())
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        Self::from(&err)
    }
}

impl From<&DatabaseError> for ErrorResponse {
    fn from(err: &DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound => Self::new(404, "record not found"),
            DatabaseError::DuplicateEntry(_) => Self::new(409, "duplicate entry"),
            DatabaseError::ConnectionFailed(_)
            | DatabaseError::QueryFailed(_)
            | DatabaseError::MigrationFailed(_) => Self::new(500, "database failure"),
        }
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Auth(e) => e.into(),
            AppError::Database(e) => e.into(),
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Internal(msg) => Self::new(err.status(), msg.clone()),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_failures_share_one_message() {
        for err in [
            AuthError::MalformedEncoding,
            AuthError::InvalidFormat,
            AuthError::InvalidSignature,
            AuthError::InvalidClaimsEncoding,
            AuthError::TokenExpired,
        ] {
            assert!(err.is_verification_failure());
            assert_eq!(err.status(), 401);
            assert_eq!(err.public_message(), "token expired");
        }
    }

    #[test]
    fn test_gate_messages() {
        assert_eq!(
            ErrorResponse::from(AuthError::MissingCredentials),
            ErrorResponse::new(401, "no authentication")
        );
        assert_eq!(
            ErrorResponse::from(AuthError::MalformedAuthorization),
            ErrorResponse::new(401, "malformed authentication format")
        );
        assert_eq!(
            ErrorResponse::from(AuthError::Forbidden),
            ErrorResponse::new(403, "insufficient access")
        );
    }

    #[test]
    fn test_database_details_are_not_exposed() {
        let err = AppError::from(DatabaseError::QueryFailed("syntax error at or near".into()));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.status, 500);
        assert!(!body.message.contains("syntax"));
    }

    #[test]
    fn test_error_response_json_shape() {
        let json = serde_json::to_string(&ErrorResponse::new(403, "insufficient access")).unwrap();
        assert_eq!(json, r#"{"status":403,"message":"insufficient access"}"#);
    }
}
