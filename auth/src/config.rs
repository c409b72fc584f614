use chrono::Duration;
use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Error raised when a [`TokenConfig`] cannot back a codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("{0} secret must not be empty")]
    EmptySecret(&'static str),

    #[error("Algorithm {0:?} is not an HMAC algorithm")]
    UnsupportedAlgorithm(Algorithm),

    #[error("Token lifetimes must be positive")]
    NonPositiveLifetime,

    #[error("Refresh token lifetime must be longer than access token lifetime")]
    RefreshNotLongerThanAccess,

    #[error("Access and refresh tokens must use different audiences")]
    SharedAudience,
}

/// Signing and lifetime settings for both token kinds.
///
/// Built once at startup and handed to [`TokenCodec`](crate::TokenCodec);
/// read-only afterwards.
#[derive(Clone)]
pub struct TokenConfig {
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub issuer: String,
    pub access_audience: String,
    pub refresh_audience: String,
}

impl TokenConfig {
    pub const DEFAULT_ISSUER: &'static str = "catering-admin";
    pub const DEFAULT_ACCESS_AUDIENCE: &'static str = "catering-admin-api";
    pub const DEFAULT_REFRESH_AUDIENCE: &'static str = "catering-admin-refresh";

    /// Create a configuration with HS256, a 15 minute access lifetime and a
    /// 7 day refresh lifetime.
    pub fn new(access_secret: impl Into<Vec<u8>>, refresh_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
            issuer: Self::DEFAULT_ISSUER.to_string(),
            access_audience: Self::DEFAULT_ACCESS_AUDIENCE.to_string(),
            refresh_audience: Self::DEFAULT_REFRESH_AUDIENCE.to_string(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_lifetimes(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_audiences(
        mut self,
        access_audience: impl Into<String>,
        refresh_audience: impl Into<String>,
    ) -> Self {
        self.access_audience = access_audience.into();
        self.refresh_audience = refresh_audience.into();
        self
    }

    /// Check the invariants a codec relies on.
    ///
    /// # Errors
    /// * `EmptySecret` - Either secret is empty
    /// * `UnsupportedAlgorithm` - Algorithm is outside the HMAC family
    /// * `NonPositiveLifetime` - A lifetime is zero or negative
    /// * `RefreshNotLongerThanAccess` - Refresh lifetime does not exceed access lifetime
    /// * `SharedAudience` - Both kinds use the same audience
    pub fn validate(&self) -> Result<(), TokenConfigError> {
        if self.access_secret.is_empty() {
            return Err(TokenConfigError::EmptySecret("access"));
        }
        if self.refresh_secret.is_empty() {
            return Err(TokenConfigError::EmptySecret("refresh"));
        }

        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenConfigError::UnsupportedAlgorithm(self.algorithm));
        }

        if self.access_ttl <= Duration::zero() || self.refresh_ttl <= Duration::zero() {
            return Err(TokenConfigError::NonPositiveLifetime);
        }
        if self.refresh_ttl <= self.access_ttl {
            return Err(TokenConfigError::RefreshNotLongerThanAccess);
        }

        if self.access_audience == self.refresh_audience {
            return Err(TokenConfigError::SharedAudience);
        }

        Ok(())
    }

    /// Whether both kinds are signed with the same key.
    pub fn shares_secret(&self) -> bool {
        self.access_secret == self.refresh_secret
    }
}
