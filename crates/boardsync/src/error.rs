use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use boardsync_core::board::ValidationError;
use boardsync_core::storage::RepositoryError;

use crate::response;

/// API error taxonomy. Client-facing messages are stable strings; internal
/// detail is only logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("access denied")]
    AccessDenied,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(ref err) => {
                tracing::warn!(error = %err, "request validation failed");
                response::error(
                    StatusCode::BAD_REQUEST,
                    "Invalid request data",
                    "VALIDATION_ERROR",
                )
            }
            ApiError::AccessDenied => {
                response::error(StatusCode::FORBIDDEN, "Access denied", "ACCESS_DENIED")
            }
            ApiError::NotFound(entity) => response::error(
                StatusCode::NOT_FOUND,
                format!("{entity} not found"),
                "NOT_FOUND",
            ),
            ApiError::Storage(err) => match err {
                RepositoryError::NotFound { .. } => response::error(
                    StatusCode::NOT_FOUND,
                    "Resource not found",
                    "NOT_FOUND",
                ),
                RepositoryError::ConnectionFailed(detail) => {
                    tracing::error!(error = %detail, "storage unavailable");
                    response::error(
                        StatusCode::BAD_GATEWAY,
                        "Storage unavailable",
                        "UPSTREAM_ERROR",
                    )
                }
                other => {
                    tracing::error!(error = %other, "storage operation failed");
                    response::error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error",
                        "INTERNAL_ERROR",
                    )
                }
            },
        }
    }
}
