use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use super::{AuthError, IdentityClaims, SessionData, SessionId, TokenSet};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Session storage abstraction. One record per session id; TTL-bound.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Write the record (create or overwrite) with a fresh TTL.
    async fn put_session(&self, id: &SessionId, data: &SessionData, ttl: Duration) -> Result<()>;

    /// Retrieve the record. Expired or absent records are `None`.
    async fn get_session(&self, id: &SessionId) -> Result<Option<SessionData>>;

    /// Delete the record. Deleting an absent record is not an error.
    async fn delete_session(&self, id: &SessionId) -> Result<()>;
}

/// Abstraction over the OIDC identity provider's hosted endpoints.
#[async_trait]
pub trait OidcProviderClient: Send + Sync {
    /// Authorize endpoint URL carrying the PKCE challenge, state and nonce.
    fn authorization_url(&self, challenge: &str, state: &str, nonce: &str) -> Url;

    /// Exchange an authorization code plus verifier for tokens.
    async fn exchange_code(&self, code: &str, verifier: &str) -> Result<TokenSet>;

    /// Exchange a refresh token for fresh tokens.
    async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenSet>;

    /// Provider end-session URL terminating the provider-side session.
    fn end_session_url(&self) -> Url;
}

/// Verification of an ID token against the provider's published key set.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    /// Verifies signature, issuer and audience; returns the decoded claims.
    /// The nonce claim is returned for the caller to compare.
    async fn verify(&self, id_token: &str) -> Result<IdentityClaims>;
}
