mod error;
mod functions;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{
    code_challenge, generate_code_verifier, generate_nonce, generate_session_id, generate_state,
    needs_refresh, token_expiry,
};
pub use traits::{IdTokenVerifier, OidcProviderClient, Result, SessionRepository};
pub use types::{
    ActiveSession, IdentityClaims, PendingLogin, SessionData, SessionId, TokenSet, UserContext,
    UserInfo,
};
