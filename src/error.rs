use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

use crate::core::PreferenceError;
use crate::models::ErrorResponse;
use crate::services::{AuthError, PostgresError};

/// Errors surfaced to HTTP callers as a JSON [`ErrorResponse`]
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

impl From<PostgresError> for ApiError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::NotFound(msg) => ApiError::NotFound(msg),
            PostgresError::InvalidInput(msg) => ApiError::Validation(msg),
            PostgresError::Conflict(msg) => ApiError::Conflict(msg),
            PostgresError::InvalidPreference(err) => err.into(),
            other => {
                tracing::error!("Database failure: {}", other);
                ApiError::Internal("Database operation failed".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        tracing::debug!("Rejected credentials: {}", err);
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<PreferenceError> for ApiError {
    fn from(err: PreferenceError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::validation(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    req: &HttpRequest,
) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    ApiError::validation(format!("Invalid query: {}", err)).into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Path error on {}: {}", req.path(), err);
    ApiError::validation(format!("Invalid path: {}", err)).into()
}
