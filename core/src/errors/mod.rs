//! Domain-specific error types and error handling.
//!
//! Invalid-token outcomes are ordinary return values throughout the crate;
//! these types exist so callers can tell expected authorization failures
//! apart from a session store that cannot currently be reached.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Malformed token")]
    TokenMalformed,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Signing key initialization failed: {message}")]
    KeyInitializationFailed { message: String },
}

/// Session store errors.
///
/// Store connectivity failures are always surfaced to the caller so that
/// "token invalid" and "cannot currently verify" stay distinguishable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Builds an `Unavailable` error from any displayable cause
    pub fn unavailable(cause: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: cause.to_string(),
        }
    }
}

/// Core errors across the authentication flow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type CoreResult<T> = Result<T, CoreError>;
