use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::session::errors::SessionError;

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid username or password";
pub const INVALID_TOKEN_MESSAGE: &str = "invalid or expired token";
pub const INVALID_REFRESH_TOKEN_MESSAGE: &str = "invalid refresh token";
pub const MISSING_AUTHORIZATION_MESSAGE: &str = "authorization header required";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

/// Client-visible messages are fixed per failure family; detail stays in the logs.
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            SessionError::MissingAuthorization => {
                ApiError::Unauthorized(MISSING_AUTHORIZATION_MESSAGE.to_string())
            }
            SessionError::MalformedAuthorization
            | SessionError::TokenExpired
            | SessionError::TokenNotYetValid
            | SessionError::TokenInvalid => {
                ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
            }
            SessionError::InvalidRefreshToken
            | SessionError::UserNotFound(_)
            | SessionError::UpstreamUnavailable(_) => {
                ApiError::Unauthorized(INVALID_REFRESH_TOKEN_MESSAGE.to_string())
            }
            SessionError::Internal(detail) => {
                tracing::error!(error = %detail, "Session operation failed");
                ApiError::InternalServerError("internal server error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}
