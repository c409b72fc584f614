use thiserror::Error;

/// Error type for JWT operations.
///
/// `InvalidToken` carries the parser detail for server-side logs only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is not valid yet")]
    TokenNotValidYet,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}
