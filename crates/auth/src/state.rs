//! Application state for auth.

use axum::extract::FromRef;
use boardsync_core::auth::{IdTokenVerifier, OidcProviderClient, SessionRepository};
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwks::RemoteJwksVerifier;
use crate::provider::HostedUiProvider;

/// Shared state for auth handlers.
#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<dyn SessionRepository>,
    pub provider: Arc<dyn OidcProviderClient>,
    pub verifier: Arc<dyn IdTokenVerifier>,
    pub config: AuthConfig,
}

impl AuthState {
    /// Creates an AuthState from explicitly constructed dependencies.
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        provider: Arc<dyn OidcProviderClient>,
        verifier: Arc<dyn IdTokenVerifier>,
        config: AuthConfig,
    ) -> Self {
        Self {
            sessions,
            provider,
            verifier,
            config,
        }
    }

    /// Creates an AuthState wired to the hosted-UI provider and remote JWKS
    /// verifier described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be constructed.
    pub fn with_provider(
        sessions: Arc<dyn SessionRepository>,
        config: AuthConfig,
    ) -> Result<Self, AuthError> {
        let provider = Arc::new(HostedUiProvider::new(&config)?);
        let http_client = reqwest::ClientBuilder::new()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Config(format!("Failed to build HTTP client: {e}")))?;
        let verifier = Arc::new(RemoteJwksVerifier::new(&config, http_client)?);

        Ok(Self::new(sessions, provider, verifier, config))
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
