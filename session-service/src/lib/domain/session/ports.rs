use async_trait::async_trait;
use auth::Identity;

use crate::domain::session::errors::CredentialStoreError;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::LoginResult;
use crate::domain::session::models::LogoutAck;
use crate::domain::session::models::RefreshResult;
use crate::domain::session::models::User;
use crate::domain::session::models::UserId;
use crate::domain::session::models::Username;

/// Port for session operations exposed to inbound adapters.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Verify a username and password and issue a token pair.
    ///
    /// # Arguments
    /// * `command` - Raw username and plaintext password
    ///
    /// # Returns
    /// Access token, refresh token and the user's public identity
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user, wrong password, or lookup failure
    /// * `Internal` - Token issuance failed
    async fn login(&self, command: LoginCommand) -> Result<LoginResult, SessionError>;

    /// Trade a refresh token for a new access token.
    ///
    /// The user is looked up again so role changes take effect here.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Token expired, not yet valid, or invalid
    /// * `UserNotFound` - Embedded user id no longer resolves
    /// * `UpstreamUnavailable` - Lookup failed or timed out
    /// * `Internal` - Token issuance failed
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, SessionError>;

    /// Acknowledge a logout. Tokens stay valid until they expire.
    async fn logout(&self) -> LogoutAck;

    /// Validate a raw `Authorization` header value.
    ///
    /// # Arguments
    /// * `authorization` - Header value, `None` when the header is absent
    ///
    /// # Errors
    /// * `MissingAuthorization` - No header
    /// * `MalformedAuthorization` - Not exactly `Bearer <token>`
    /// * `TokenExpired` / `TokenNotYetValid` / `TokenInvalid` - Token rejected
    fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, SessionError>;
}

/// Read-only access to stored user credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user record (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Backing store could not be reached
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, CredentialStoreError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user record (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Backing store could not be reached
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialStoreError>;
}
