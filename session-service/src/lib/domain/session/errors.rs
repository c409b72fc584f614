use std::time::Duration;

use auth::TokenError;
use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for credential store lookups
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    #[error("Credential store lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("Stored user record is corrupt: {0}")]
    CorruptRecord(String),
}

/// Top-level error for session operations.
///
/// Variants are deliberately coarse; inbound adapters map several of them to
/// the same client-visible message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authorization header required")]
    MissingAuthorization,

    #[error("Authorization header must use the Bearer scheme")]
    MalformedAuthorization,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is not valid yet")]
    TokenNotYetValid,

    #[error("Token is invalid")]
    TokenInvalid,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Credential store unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for SessionError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => SessionError::TokenExpired,
            TokenError::NotYetValid => SessionError::TokenNotYetValid,
            TokenError::Invalid => SessionError::TokenInvalid,
            TokenError::Issuance(msg) => SessionError::Internal(msg),
        }
    }
}

impl From<CredentialStoreError> for SessionError {
    fn from(err: CredentialStoreError) -> Self {
        SessionError::UpstreamUnavailable(err.to_string())
    }
}
