use chrono::Duration;

use crate::codec::TokenCodec;
use crate::codec::TokenError;
use crate::identity::Identity;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Every password failure, whatever its cause, surfaces as
/// `InvalidCredentials`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    codec: TokenCodec,
    /// Hash checked when the user does not exist, so that path costs one verification too.
    dummy_hash: Option<String>,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Short-lived access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `codec` - Token codec holding both signing secrets
    /// * `password_hasher` - Argon2 hasher used for new hashes and the dummy hash
    pub fn new(codec: TokenCodec, password_hasher: PasswordHasher) -> Self {
        let dummy_hash = match password_hasher.hash("unknown-user-placeholder") {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to prepare dummy password hash");
                None
            }
        };

        Self {
            password_hasher,
            codec,
            dummy_hash,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn access_ttl(&self) -> Duration {
        self.codec.access_ttl()
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        match self.password_hasher.verify(password, stored_hash) {
            Ok(is_valid) => is_valid,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }

    /// Spend one password verification and fail.
    ///
    /// Used when the username does not resolve so that the response time
    /// matches a wrong password for an existing user.
    pub fn reject_unknown_user(&self, password: &str) -> AuthenticationError {
        if let Some(hash) = &self.dummy_hash {
            let _ = self.password_hasher.verify(password, hash);
        }

        AuthenticationError::InvalidCredentials
    }

    /// Verify credentials and issue an access and refresh token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `identity` - Identity embedded in the access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or hash is unusable
    /// * `Token` - Token issuance failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &Identity,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.codec.issue_access(identity)?;
        let refresh_token = self.codec.issue_refresh(identity.user_id)?;

        Ok(AuthenticationResult {
            access_token,
            refresh_token,
        })
    }

    /// Issue an access token without password verification.
    ///
    /// For the refresh flow, where the refresh token stands in for the password.
    pub fn issue_access(&self, identity: &Identity) -> Result<String, TokenError> {
        self.codec.issue_access(identity)
    }

    pub fn validate_access(&self, token: &str) -> Result<Identity, TokenError> {
        self.codec.validate_access(token)
    }

    pub fn validate_refresh(&self, token: &str) -> Result<i64, TokenError> {
        self.codec.validate_refresh(token)
    }
}
