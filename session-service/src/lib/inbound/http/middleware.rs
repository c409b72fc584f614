use auth::Identity;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::session::errors::SessionError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: Identity,
}

/// Middleware that validates the bearer access token and adds the identity to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = {
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .map(|value| value.to_str())
            .transpose()
            .map_err(|_| SessionError::MalformedAuthorization)?;

        state.session_service.authenticate(authorization)?
    };

    tracing::debug!(user_id = identity.user_id, role = %identity.role, "Request authenticated");

    req.extensions_mut().insert(AuthenticatedUser { identity });

    Ok(next.run(req).await)
}
