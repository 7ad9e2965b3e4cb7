//! Error types for authentication operations
//!
//! This module defines all error types that can occur during token
//! validation, authorization checks, and user resolution.

use thiserror::Error;

/// Authentication error types.
///
/// Expected credential failures (expired or malformed tokens, CSRF
/// mismatches) are recovered by the guard into an anonymous identity and
/// never surface through these variants. What does surface is the explicit
/// taxonomy: authorization failures, configuration failures, and
/// infrastructure failures from the user store.
#[derive(Debug, Error)]
pub enum AuthError {
    /// JWT token has expired
    #[error("Token has expired")]
    TokenExpired,

    /// JWT token is invalid (malformed, bad signature, etc.)
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token is missing required claims
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// An authenticated identity is required but none is present
    #[error("Request requires authentication")]
    AuthenticationRequired,

    /// The authenticated identity lacks a required capability
    #[error("Missing scopes: {}", .0.join(", "))]
    MissingScope(Vec<String>),

    /// Configuration error (bad key material, missing secrets)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// User store failure
    #[error("User store error: {0}")]
    Store(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Check if this error should be logged at error level.
    ///
    /// Credential and capability failures are expected and should not be
    /// logged as errors.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AuthError::Internal(_) | AuthError::ConfigError(_) | AuthError::Store(_)
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::MissingClaim(_)
            | AuthError::AuthenticationRequired => 401,

            AuthError::MissingScope(_) => 403,

            AuthError::ConfigError(_) | AuthError::Store(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::MissingClaim(_) => "MISSING_CLAIM",
            AuthError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            AuthError::MissingScope(_) => "MISSING_SCOPE",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
            AuthError::Store(_) => "STORE_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
