//! Application error taxonomy shared by the operation layer and the HTTP
//! surface. Every business-rule violation maps to one variant, and each
//! variant to exactly one HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed, missing, or out-of-range input. 400.
    #[error("{0}")]
    Validation(String),

    /// Login with unknown credentials. 401.
    #[error("{0}")]
    InvalidCredentials(String),

    /// Missing identity, wrong role, or not the assigned teacher. 403.
    #[error("{0}")]
    Forbidden(String),

    /// Unknown record id. 404.
    #[error("{0}")]
    NotFound(String),

    /// Illegal state transition: already finalized, not finalized, or a
    /// missing prerequisite grade. 409.
    #[error("{0}")]
    Conflict(String),

    /// Store failure. Logged; the caller only sees a generic message. 500.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> ApiError {
        ApiError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> ApiError {
        ApiError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> ApiError {
        ApiError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> ApiError {
        ApiError::Conflict(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
