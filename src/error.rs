//! Two-level error model: [`ServiceError`] is the taxonomy the service layer
//! speaks, [`AppError`] is its HTTP projection.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError,
    state::{chat::ChatError, sessions::SessionError},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Storage call exceeded its deadline.
    #[error("storage operation timed out")]
    Timeout,
    /// Malformed caller input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Unknown nick or wrong password. Deliberately indistinguishable so the
    /// response cannot be used to enumerate registered nicks.
    #[error("authentication failed")]
    AuthFailed,
    /// Session token is unknown or has expired.
    #[error("invalid session")]
    InvalidSession,
    /// Admission control rejected the login: the server is at capacity.
    #[error("server full")]
    ServerFull,
    /// Request conflicts with existing state (duplicate nick, second login).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { message } => ServiceError::Conflict(message),
            unavailable => ServiceError::Unavailable(unavailable),
        }
    }
}

impl From<SessionError> for ServiceError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::AtCapacity { .. } => ServiceError::ServerFull,
            SessionError::AlreadyLoggedIn { nick } => {
                ServiceError::Conflict(format!("player `{nick}` is already logged in"))
            }
            SessionError::InvalidSession => ServiceError::InvalidSession,
        }
    }
}

impl From<ChatError> for ServiceError {
    fn from(err: ChatError) -> Self {
        ServiceError::InvalidArgument(err.to_string())
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::InvalidArgument(format!("validation failed: {err}"))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Credentials, input, or session token were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The server is at capacity; the caller may retry later.
    #[error("too many requests: {0}")]
    TooManyRequests(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            // Display only: storage error internals (and any SQL text they
            // might carry) must not reach the caller.
            ServiceError::Unavailable(_) => AppError::Internal("storage unavailable".into()),
            ServiceError::Degraded => AppError::Internal("storage unavailable".into()),
            ServiceError::Timeout => AppError::Internal("storage operation timed out".into()),
            ServiceError::InvalidArgument(message) => AppError::Unauthorized(message),
            ServiceError::AuthFailed => AppError::Unauthorized("authentication failed".into()),
            ServiceError::InvalidSession => AppError::Unauthorized("invalid session".into()),
            ServiceError::ServerFull => AppError::TooManyRequests("server full".into()),
            ServiceError::Conflict(message) => AppError::Conflict(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
