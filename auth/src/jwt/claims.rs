use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::identity::Identity;

/// The `aud` claim, which RFC 7519 allows as a single string or an array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Audience::Single(aud) => aud == value,
            Audience::Many(auds) => auds.iter().any(|aud| aud == value),
        }
    }
}

impl From<&str> for Audience {
    fn from(value: &str) -> Self {
        Audience::Many(vec![value.to_string()])
    }
}

/// Registered claims every token kind must carry.
///
/// Used by [`JwtHandler`](super::JwtHandler) to re-check timing, issuer and
/// audience after the library has decoded the payload.
pub trait RegisteredClaims {
    fn issuer(&self) -> &str;
    fn audience(&self) -> &Audience;
    fn not_before(&self) -> i64;
    fn expires_at(&self) -> i64;

    /// Check if token is expired.
    fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp > self.expires_at()
    }

    /// Check if token is not usable yet.
    fn is_not_yet_valid(&self, current_timestamp: i64) -> bool {
        current_timestamp < self.not_before()
    }
}

/// Claims of a short-lived access token.
///
/// The identity travels as custom claims (`user_id`, `role`); there is no `sub`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub user_id: i64,
    pub role: String,
    pub iss: String,
    pub aud: Audience,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    /// Unique token identifier (reserved for revocation lists)
    pub jti: String,
}

impl AccessClaims {
    /// Create access claims for an identity.
    ///
    /// # Arguments
    /// * `identity` - Authenticated subject
    /// * `issuer` - Issuer string
    /// * `audience` - Audience the token is minted for
    /// * `issued_at` - Issuance instant; `nbf` equals this
    /// * `lifetime` - Duration until `exp`
    pub fn new(
        identity: &Identity,
        issuer: &str,
        audience: &str,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            user_id: identity.user_id,
            role: identity.role.clone(),
            iss: issuer.to_string(),
            aud: Audience::from(audience),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.user_id, self.role.clone())
    }
}

impl RegisteredClaims for AccessClaims {
    fn issuer(&self) -> &str {
        &self.iss
    }

    fn audience(&self) -> &Audience {
        &self.aud
    }

    fn not_before(&self) -> i64 {
        self.nbf
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Claims of a long-lived refresh token.
///
/// The only payload is the user id, stored as the registered `sub` claim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub sub: String,
    pub iss: String,
    pub aud: Audience,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
}

impl RefreshClaims {
    pub fn new(
        user_id: i64,
        issuer: &str,
        audience: &str,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            iss: issuer.to_string(),
            aud: Audience::from(audience),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Parse the subject back into a user id.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

impl RegisteredClaims for RefreshClaims {
    fn issuer(&self) -> &str {
        &self.iss
    }

    fn audience(&self) -> &Audience {
        &self.aud
    }

    fn not_before(&self) -> i64 {
        self.nbf
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}
