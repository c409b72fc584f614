use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Stateless logout: the client discards its tokens.
pub async fn logout(State(state): State<AppState>) -> ApiSuccess<LogoutResponseData> {
    state.session_service.logout().await;

    ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData {
            message: "logged out".to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
