use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
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
use crate::domain::session::ports::CredentialStore;
use crate::domain::session::ports::SessionServicePort;

const BEARER_PREFIX: &str = "Bearer ";

/// Domain service issuing and validating sessions.
///
/// Holds no per-session state. Credential store lookups are bounded by
/// `lookup_timeout`; password verification runs on the blocking pool.
pub struct SessionService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
    lookup_timeout: Duration,
}

impl<CS> SessionService<CS>
where
    CS: CredentialStore,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential store implementation
    /// * `authenticator` - Password and token machinery
    /// * `lookup_timeout` - Upper bound for a single credential store lookup
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator>, lookup_timeout: Duration) -> Self {
        Self {
            store,
            authenticator,
            lookup_timeout,
        }
    }

    async fn lookup<F>(&self, lookup: F) -> Result<Option<User>, SessionError>
    where
        F: Future<Output = Result<Option<User>, CredentialStoreError>>,
    {
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(result) => result.map_err(SessionError::from),
            Err(_) => Err(CredentialStoreError::Timeout(self.lookup_timeout).into()),
        }
    }

    async fn find_login_user(&self, username: &str) -> Option<User> {
        let username = match Username::new(username.to_string()) {
            Ok(username) => username,
            Err(e) => {
                tracing::debug!(error = %e, "Login with malformed username");
                return None;
            }
        };

        match self.lookup(self.store.find_by_username(&username)).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                tracing::debug!(username = %username, "Login for unknown username");
                None
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Credential lookup failed during login");
                None
            }
        }
    }
}

#[async_trait]
impl<CS> SessionServicePort for SessionService<CS>
where
    CS: CredentialStore,
{
    async fn login(&self, command: LoginCommand) -> Result<LoginResult, SessionError> {
        let LoginCommand { username, password } = command;
        let user = self.find_login_user(&username).await;
        let authenticator = Arc::clone(&self.authenticator);

        let Some(user) = user else {
            tokio::task::spawn_blocking(move || authenticator.reject_unknown_user(&password))
                .await
                .map_err(|e| SessionError::Internal(e.to_string()))?;
            return Err(SessionError::InvalidCredentials);
        };

        let identity = user.identity();
        let password_hash = user.password_hash.clone();
        let token_identity = identity.clone();

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &password_hash, &token_identity)
        })
        .await
        .map_err(|e| SessionError::Internal(e.to_string()))?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::debug!(user_id = %user.id, "Login with wrong password");
                SessionError::InvalidCredentials
            }
            AuthenticationError::Token(err) => SessionError::from(err),
        })?;

        tracing::info!(user_id = %user.id, role = %identity.role, "User logged in");

        Ok(LoginResult {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            expires_in: self.authenticator.access_ttl().num_seconds(),
            identity,
            username: user.username,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, SessionError> {
        let user_id = self
            .authenticator
            .validate_refresh(refresh_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token rejected");
                SessionError::InvalidRefreshToken
            })?;

        let user = self
            .lookup(self.store.find_by_id(&UserId(user_id)))
            .await
            .map_err(|e| {
                tracing::warn!(user_id, error = %e, "Credential lookup failed during refresh");
                e
            })?
            .ok_or(SessionError::UserNotFound(user_id))?;

        let identity = user.identity();
        let access_token = self.authenticator.issue_access(&identity)?;

        tracing::info!(user_id, role = %identity.role, "Access token refreshed");

        Ok(RefreshResult {
            access_token,
            expires_in: self.authenticator.access_ttl().num_seconds(),
        })
    }

    async fn logout(&self) -> LogoutAck {
        tracing::info!("Logout acknowledged; issued tokens remain valid until expiry");
        LogoutAck
    }

    fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, SessionError> {
        let header = authorization.ok_or(SessionError::MissingAuthorization)?;

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .filter(|token| !token.is_empty() && !token.contains(char::is_whitespace))
            .ok_or(SessionError::MalformedAuthorization)?;

        self.authenticator.validate_access(token).map_err(|e| {
            tracing::warn!(reason = %e, "Bearer token rejected");
            SessionError::from(e)
        })
    }
}
