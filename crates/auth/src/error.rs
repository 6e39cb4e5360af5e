use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Auth errors for the boardsync_auth crate.
///
/// Wraps the core `AuthError` and adds crate-specific variants for I/O
/// that can't live in the functional core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (flow state, token parsing, etc.)
    #[error(transparent)]
    Core(#[from] boardsync_core::auth::AuthError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use boardsync_core::auth::AuthError as CoreError;

        let (status, message) = match &self {
            AuthError::Core(core_err) => match core_err {
                CoreError::MissingSessionCookie => {
                    (StatusCode::BAD_REQUEST, "Missing session cookie".to_string())
                }
                CoreError::SessionExpired => {
                    (StatusCode::BAD_REQUEST, "Session expired".to_string())
                }
                CoreError::MissingCode => (StatusCode::BAD_REQUEST, "Missing code".to_string()),
                CoreError::InvalidState => (StatusCode::FORBIDDEN, "Invalid state".to_string()),
                CoreError::CodeExchange(_) => {
                    tracing::error!("Token endpoint error: {}", self);
                    (StatusCode::BAD_GATEWAY, "Token exchange failed".to_string())
                }
                CoreError::InvalidToken(_) | CoreError::NonceMismatch => {
                    tracing::warn!("ID token verification failed: {}", self);
                    (StatusCode::UNAUTHORIZED, "Invalid ID token".to_string())
                }
                CoreError::NotLoggedIn => (StatusCode::UNAUTHORIZED, "No session".to_string()),
                CoreError::Storage(_) | CoreError::Provider(_) => {
                    tracing::error!("Auth error: {}", self);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            AuthError::Config(_) => {
                tracing::error!("Config error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
