//! Unified application error types for Warden.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The authentication taxonomy seen by
//! callers is expressed through [`ErrorKind`].

use std::fmt;
use thiserror::Error;

/// Message shared by every rejected credential check.
///
/// Unknown login names, wrong passwords and lockouts all carry this text so
/// the content of a rejection never reveals which check failed.
pub const CREDENTIALS_REJECTED: &str = "bad username or password";

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Unknown identifier or wrong password.
    BadCredentials,
    /// The credential's failure count is over the lockout threshold.
    LockedOut,
    /// A password change supplied the current password as the new one.
    PasswordsUnchanged,
    /// The session token is absent, expired, or not owned by the caller.
    Forbidden,
    /// The user already holds the maximum number of live sessions.
    TooManyConcurrentSessions,
    /// The requested record was not found.
    NotFound,
    /// A uniqueness constraint was violated.
    Conflict,
    /// Input validation failed.
    Validation,
    /// An internal error occurred.
    Internal,
    /// A relational store error occurred.
    Database,
    /// A key-value store error occurred.
    Cache,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
}

impl ErrorKind {
    /// Whether this kind is reported to callers as an internal error.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Internal
                | Self::Database
                | Self::Cache
                | Self::Serialization
                | Self::Configuration
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadCredentials => write!(f, "BAD_CREDENTIALS"),
            Self::LockedOut => write!(f, "LOCKED_OUT"),
            Self::PasswordsUnchanged => write!(f, "PASSWORDS_UNCHANGED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::TooManyConcurrentSessions => write!(f, "TOO_MANY_CONCURRENT_SESSIONS"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// The unified application error used throughout Warden.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap a store-level error as an internal error tagged with the
    /// operation that produced it.
    pub fn wrap(operation: &str, err: AppError) -> Self {
        let message = format!("{operation}: {}", err.message);
        Self::with_source(ErrorKind::Internal, message, err)
    }

    /// Create a bad-credentials rejection.
    pub fn bad_credentials() -> Self {
        Self::new(ErrorKind::BadCredentials, CREDENTIALS_REJECTED)
    }

    /// Create a lockout rejection. The message is the same as
    /// [`AppError::bad_credentials`].
    pub fn locked_out() -> Self {
        Self::new(ErrorKind::LockedOut, CREDENTIALS_REJECTED)
    }

    /// Create a passwords-unchanged rejection.
    pub fn passwords_unchanged() -> Self {
        Self::new(
            ErrorKind::PasswordsUnchanged,
            "new password must differ from the current password",
        )
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a too-many-concurrent-sessions error.
    pub fn too_many_sessions(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TooManyConcurrentSessions, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether this error is reported to callers as an internal error.
    pub fn is_internal(&self) -> bool {
        self.kind.is_internal()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_share_message() {
        let bad = AppError::bad_credentials();
        let locked = AppError::locked_out();
        assert_eq!(bad.message, locked.message);
        assert_ne!(bad.kind, locked.kind);
    }

    #[test]
    fn test_wrap_is_internal() {
        let err = AppError::wrap("record_failure", AppError::not_found("credential not updated"));
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.message, "record_failure: credential not updated");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_store_kinds_are_internal() {
        assert!(ErrorKind::Database.is_internal());
        assert!(ErrorKind::Cache.is_internal());
        assert!(!ErrorKind::Forbidden.is_internal());
        assert!(!ErrorKind::NotFound.is_internal());
    }
}
