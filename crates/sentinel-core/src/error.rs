//! Unified application error types for Sentinel.
//!
//! Every crate maps its failures into [`AppError`] so that the boundary can
//! hand callers a structured, typed failure. Only [`ErrorKind::Internal`]
//! and friends represent infrastructure faults; their detail never reaches
//! the caller (see [`AppError::public_message`]).

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Wrong email or wrong password. The two are indistinguishable.
    InvalidCredentials,
    /// Account is inactive, not approved, or currently locked.
    AccountDisabled,
    /// The password is older than the configured maximum age.
    PasswordExpired,
    /// Token is expired, malformed, carries a bad signature, or the wrong type.
    TokenInvalid,
    /// No authenticated principal is present.
    Unauthenticated,
    /// The principal lacks the required permission.
    Forbidden,
    /// Input validation failed.
    Validation,
    /// The requested user, role, or permission was not found.
    NotFound,
    /// A uniqueness or reference constraint would be violated.
    Conflict,
    /// A system role or master account may not be mutated this way.
    ProtectedResource,
    /// An internal or infrastructure error occurred.
    Internal,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl ErrorKind {
    /// Whether this kind is an infrastructure fault whose detail must stay private.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Configuration | Self::Serialization)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::AccountDisabled => write!(f, "ACCOUNT_DISABLED"),
            Self::PasswordExpired => write!(f, "PASSWORD_EXPIRED"),
            Self::TokenInvalid => write!(f, "TOKEN_INVALID"),
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::ProtectedResource => write!(f, "PROTECTED_RESOURCE"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified application error used throughout Sentinel.
///
/// `details` carries structured payload for the kinds that need one: the full
/// violation list for [`ErrorKind::Validation`] and the required permission
/// name for [`ErrorKind::Forbidden`].
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Structured details (violations, required permission).
    pub details: Vec<String>,
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
            details: Vec::new(),
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
            details: Vec::new(),
            source: Some(Box::new(source)),
        }
    }

    /// The generic failure for an unknown email or a wrong password.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid email or password")
    }

    /// Create an account-disabled error.
    pub fn account_disabled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountDisabled, message)
    }

    /// The account-disabled error for a lock with `remaining` time left,
    /// rounded up to whole minutes.
    pub fn account_locked(remaining: chrono::Duration) -> Self {
        let minutes = (remaining.num_seconds().max(0) + 59) / 60;
        Self::account_disabled(format!(
            "Account is locked. Try again in {minutes} minute(s)."
        ))
    }

    /// Create a password-expired error.
    pub fn password_expired() -> Self {
        Self::new(
            ErrorKind::PasswordExpired,
            "Password has expired. Please change your password.",
        )
    }

    /// Create a token-invalid error.
    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenInvalid, message)
    }

    /// Create an unauthenticated error.
    pub fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated, "Authentication is required")
    }

    /// Create a forbidden error naming the missing permission.
    pub fn forbidden(required_permission: impl Into<String>) -> Self {
        let permission = required_permission.into();
        Self {
            kind: ErrorKind::Forbidden,
            message: format!("Missing required permission '{permission}'"),
            details: vec![permission],
            source: None,
        }
    }

    /// Create a validation error with a single message.
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ErrorKind::Validation,
            details: vec![message.clone()],
            message,
            source: None,
        }
    }

    /// Create a validation error carrying every violation at once.
    pub fn validation_failed(violations: Vec<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: violations.join(", "),
            details: violations,
            source: None,
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a protected-resource error.
    pub fn protected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProtectedResource, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// The required permission carried by a [`ErrorKind::Forbidden`] error.
    pub fn required_permission(&self) -> Option<&str> {
        match self.kind {
            ErrorKind::Forbidden => self.details.first().map(String::as_str),
            _ => None,
        }
    }

    /// The violation list carried by a [`ErrorKind::Validation`] error.
    pub fn violations(&self) -> &[String] {
        match self.kind {
            ErrorKind::Validation => &self.details,
            _ => &[],
        }
    }

    /// The message safe to show a caller. Infrastructure faults are masked.
    pub fn public_message(&self) -> &str {
        if self.kind.is_internal() {
            "An internal error occurred"
        } else {
            &self.message
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            details: self.details.clone(),
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
