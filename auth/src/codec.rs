use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use thiserror::Error;

use crate::config::TokenConfig;
use crate::config::TokenConfigError;
use crate::identity::Identity;
use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::RefreshClaims;

/// Caller-visible token failure.
///
/// Parser detail never leaves the codec; it is logged before collapsing into
/// one of these kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is expired")]
    Expired,

    #[error("Token is not valid yet")]
    NotYetValid,

    #[error("Token is invalid")]
    Invalid,

    #[error("Failed to issue token: {0}")]
    Issuance(String),
}

/// Issues and validates access and refresh tokens.
///
/// Holds one [`JwtHandler`] per token kind, each with its own secret and
/// audience. Stateless: nothing is persisted, so a codec can be shared
/// across threads behind an `Arc`.
pub struct TokenCodec {
    access: JwtHandler,
    refresh: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Create a codec from validated configuration.
    ///
    /// # Errors
    /// * `TokenConfigError` - Configuration violates a codec invariant
    pub fn new(config: &TokenConfig) -> Result<Self, TokenConfigError> {
        config.validate()?;

        if config.shares_secret() {
            tracing::warn!(
                "Access and refresh tokens share a signing secret; only audience separates them"
            );
        }

        Ok(Self {
            access: JwtHandler::new(
                &config.access_secret,
                config.algorithm,
                config.issuer.clone(),
                config.access_audience.clone(),
            ),
            refresh: JwtHandler::new(
                &config.refresh_secret,
                config.algorithm,
                config.issuer.clone(),
                config.refresh_audience.clone(),
            ),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issue an access token for an identity, valid from now.
    pub fn issue_access(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_access_at(identity, Utc::now())
    }

    /// Issue an access token whose `iat`/`nbf` is `issued_at`.
    pub fn issue_access_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = AccessClaims::new(
            identity,
            self.access.issuer(),
            self.access.audience(),
            issued_at,
            self.access_ttl,
        );

        self.access.encode(&claims).map_err(issuance_error)
    }

    /// Issue a refresh token for a user, valid from now.
    pub fn issue_refresh(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue_refresh_at(user_id, Utc::now())
    }

    /// Issue a refresh token whose `iat`/`nbf` is `issued_at`.
    pub fn issue_refresh_at(
        &self,
        user_id: i64,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = RefreshClaims::new(
            user_id,
            self.refresh.issuer(),
            self.refresh.audience(),
            issued_at,
            self.refresh_ttl,
        );

        self.refresh.encode(&claims).map_err(issuance_error)
    }

    /// Validate an access token and return the identity it carries.
    ///
    /// # Errors
    /// * `Expired` - Past `exp`
    /// * `NotYetValid` - Before `nbf`
    /// * `Invalid` - Any structural, algorithm, signature, issuer or audience failure
    pub fn validate_access(&self, token: &str) -> Result<Identity, TokenError> {
        self.access
            .decode::<AccessClaims>(token)
            .map(|claims| claims.identity())
            .map_err(|e| rejection("access", e))
    }

    /// Validate a refresh token and return the user id it carries.
    ///
    /// # Errors
    /// Same kinds as [`validate_access`](Self::validate_access); a
    /// non-numeric subject is `Invalid`.
    pub fn validate_refresh(&self, token: &str) -> Result<i64, TokenError> {
        let claims = self
            .refresh
            .decode::<RefreshClaims>(token)
            .map_err(|e| rejection("refresh", e))?;

        claims.user_id().ok_or_else(|| {
            tracing::warn!(token_kind = "refresh", "Token subject is not a user id");
            TokenError::Invalid
        })
    }
}

fn issuance_error(err: JwtError) -> TokenError {
    tracing::error!(error = %err, "Token issuance failed");
    TokenError::Issuance(err.to_string())
}

fn rejection(token_kind: &'static str, err: JwtError) -> TokenError {
    match err {
        JwtError::TokenExpired => {
            tracing::debug!(token_kind, "Token rejected: expired");
            TokenError::Expired
        }
        JwtError::TokenNotValidYet => {
            tracing::debug!(token_kind, "Token rejected: not valid yet");
            TokenError::NotYetValid
        }
        JwtError::InvalidToken(reason) | JwtError::EncodingFailed(reason) => {
            tracing::warn!(token_kind, reason = %reason, "Token rejected: invalid");
            TokenError::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_SECRET: &[u8] = b"access_secret_at_least_32_bytes_long!";
    const REFRESH_SECRET: &[u8] = b"refresh_secret_at_least_32_bytes_long";

    fn config() -> TokenConfig {
        TokenConfig::new(ACCESS_SECRET, REFRESH_SECRET)
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(&config()).expect("Failed to build codec")
    }

    #[test]
    fn test_access_round_trip() {
        let codec = codec();
        let identity = Identity::new(1, "admin");

        let token = codec.issue_access(&identity).expect("Failed to issue token");
        let decoded = codec.validate_access(&token).expect("Failed to validate");

        assert_eq!(decoded, identity);
    }

    #[test]
    fn test_refresh_round_trip() {
        let codec = codec();

        let token = codec.issue_refresh(7).expect("Failed to issue token");
        assert_eq!(codec.validate_refresh(&token), Ok(7));
    }

    #[test]
    fn test_access_valid_just_before_expiry() {
        let codec = codec();
        let identity = Identity::new(1, "admin");
        let issued_at = Utc::now() - codec.access_ttl() + Duration::seconds(5);

        let token = codec
            .issue_access_at(&identity, issued_at)
            .expect("Failed to issue token");

        assert_eq!(codec.validate_access(&token), Ok(identity));
    }

    #[test]
    fn test_access_expired_just_after_expiry() {
        let codec = codec();
        let identity = Identity::new(1, "admin");
        let issued_at = Utc::now() - codec.access_ttl() - Duration::seconds(5);

        let token = codec
            .issue_access_at(&identity, issued_at)
            .expect("Failed to issue token");

        assert_eq!(codec.validate_access(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_access_not_yet_valid() {
        let codec = codec();
        let token = codec
            .issue_access_at(&Identity::new(1, "admin"), Utc::now() + Duration::minutes(1))
            .expect("Failed to issue token");

        assert_eq!(codec.validate_access(&token), Err(TokenError::NotYetValid));
    }

    #[test]
    fn test_refresh_expired() {
        let codec = codec();
        let issued_at = Utc::now() - codec.refresh_ttl() - Duration::seconds(5);
        let token = codec
            .issue_refresh_at(3, issued_at)
            .expect("Failed to issue token");

        assert_eq!(codec.validate_refresh(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let codec = codec();
        let token = codec.issue_refresh(1).expect("Failed to issue token");

        assert_eq!(codec.validate_access(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let codec = codec();
        let token = codec
            .issue_access(&Identity::new(1, "admin"))
            .expect("Failed to issue token");

        assert_eq!(codec.validate_refresh(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_audience_separates_kinds_with_shared_secret() {
        let codec = TokenCodec::new(&TokenConfig::new(ACCESS_SECRET, ACCESS_SECRET))
            .expect("Failed to build codec");

        let refresh = codec.issue_refresh(1).expect("Failed to issue token");
        let access = codec
            .issue_access(&Identity::new(1, "admin"))
            .expect("Failed to issue token");

        assert_eq!(codec.validate_access(&refresh), Err(TokenError::Invalid));
        assert_eq!(codec.validate_refresh(&access), Err(TokenError::Invalid));
    }

    #[test]
    fn test_algorithm_confusion_rejected() {
        // Same secrets, HS512 instead of HS256
        let other = TokenCodec::new(&config().with_algorithm(jsonwebtoken::Algorithm::HS512))
            .expect("Failed to build codec");
        let token = other
            .issue_access(&Identity::new(1, "admin"))
            .expect("Failed to issue token");

        assert_eq!(codec().validate_access(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_tokens_from_other_deployment_rejected() {
        let other = TokenCodec::new(&TokenConfig::new(
            b"another_access_secret_32_bytes_long!".to_vec(),
            REFRESH_SECRET,
        ))
        .expect("Failed to build codec");
        let token = other
            .issue_access(&Identity::new(1, "admin"))
            .expect("Failed to issue token");

        assert_eq!(codec().validate_access(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_garbage_rejected() {
        let codec = codec();
        assert_eq!(codec.validate_access(""), Err(TokenError::Invalid));
        assert_eq!(codec.validate_access("abc"), Err(TokenError::Invalid));
        assert_eq!(codec.validate_refresh("a.b.c"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = TokenCodec::new(&TokenConfig::new(Vec::<u8>::new(), REFRESH_SECRET));
        assert!(matches!(result, Err(TokenConfigError::EmptySecret(_))));
    }
}
