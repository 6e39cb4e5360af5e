use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing session cookie")]
    MissingSessionCookie,

    #[error("session expired")]
    SessionExpired,

    #[error("missing authorization code")]
    MissingCode,

    #[error("invalid OAuth state parameter")]
    InvalidState,

    #[error("failed to exchange authorization code: {0}")]
    CodeExchange(String),

    #[error("invalid ID token: {0}")]
    InvalidToken(String),

    #[error("nonce mismatch")]
    NonceMismatch,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("provider error: {0}")]
    Provider(String),
}
