//! Hosted-UI OIDC provider client.
//!
//! Talks to a Cognito-style hosted UI: `/oauth2/authorize` for the login
//! redirect, `/oauth2/token` for code and refresh exchanges, and `/logout`
//! for provider-side session termination.

use async_trait::async_trait;
use boardsync_core::auth::{AuthError, OidcProviderClient, Result, TokenSet};
use std::time::Duration;
use url::Url;

use crate::config::AuthConfig;

/// Default timeout for outbound calls to the identity provider.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HostedUiProvider {
    domain: Url,
    client_id: String,
    scope: String,
    redirect_uri: Url,
    logout_redirect_uri: Url,
    http_client: reqwest::Client,
}

impl HostedUiProvider {
    /// Create a provider client from the auth configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        // No redirect following; the token endpoint must answer directly.
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Provider(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            domain: config.domain.clone(),
            client_id: config.client_id.clone(),
            scope: config.scope.clone(),
            redirect_uri: config.redirect_uri.clone(),
            logout_redirect_uri: config.logout_redirect_uri.clone(),
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        self.domain
            .join(path)
            .expect("provider endpoint paths are static and valid")
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenSet> {
        let response = self
            .http_client
            .post(self.endpoint("/oauth2/token"))
            .form(params)
            .send()
            .await
            .map_err(|e| AuthError::CodeExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "token endpoint error");
            return Err(AuthError::CodeExchange(format!(
                "token endpoint returned {status}"
            )));
        }

        response
            .json::<TokenSet>()
            .await
            .map_err(|e| AuthError::CodeExchange(e.to_string()))
    }
}

#[async_trait]
impl OidcProviderClient for HostedUiProvider {
    fn authorization_url(&self, challenge: &str, state: &str, nonce: &str) -> Url {
        let mut url = self.endpoint("/oauth2/authorize");
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scope)
            .append_pair("redirect_uri", self.redirect_uri.as_str())
            .append_pair("code_challenge", challenge)
            .append_pair("code_challenge_method", "S256")
            .append_pair("state", state)
            .append_pair("nonce", nonce);
        url
    }

    async fn exchange_code(&self, code: &str, verifier: &str) -> Result<TokenSet> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("client_id", &self.client_id),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ])
        .await
    }

    async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenSet> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("client_id", &self.client_id),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    fn end_session_url(&self) -> Url {
        let mut url = self.endpoint("/logout");
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("logout_uri", self.logout_redirect_uri.as_str());
        url
    }
}
