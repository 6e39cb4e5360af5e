//! ID token verification against the provider's published key set.

use async_trait::async_trait;
use boardsync_core::auth::{AuthError, IdTokenVerifier, IdentityClaims, Result};
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use tokio::sync::RwLock;
use url::Url;

use crate::config::AuthConfig;

/// Verifies ID tokens using the JWK set published at
/// `{issuer}/.well-known/jwks.json`.
///
/// The key set is fetched lazily and cached; an unknown `kid` triggers one
/// re-fetch to pick up rotated keys. Independent requests may race to
/// refresh the cache; the fetch is idempotent so the last writer wins.
pub struct RemoteJwksVerifier {
    jwks_uri: Url,
    issuer: String,
    audience: String,
    http_client: reqwest::Client,
    keys: RwLock<Option<JwkSet>>,
}

impl RemoteJwksVerifier {
    /// Create a verifier from the auth configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JWKS URL cannot be derived from the issuer.
    pub fn new(config: &AuthConfig, http_client: reqwest::Client) -> Result<Self> {
        let issuer = config.issuer.as_str().trim_end_matches('/').to_string();
        let jwks_uri = format!("{issuer}/.well-known/jwks.json")
            .parse()
            .map_err(|e| AuthError::Provider(format!("invalid JWKS URL: {e}")))?;

        Ok(Self {
            jwks_uri,
            issuer,
            audience: config.client_id.clone(),
            http_client,
            keys: RwLock::new(None),
        })
    }

    async fn fetch_key_set(&self) -> Result<JwkSet> {
        let key_set = self
            .http_client
            .get(self.jwks_uri.clone())
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("JWKS fetch failed: {e}")))?
            .error_for_status()
            .map_err(|e| AuthError::Provider(format!("JWKS fetch failed: {e}")))?
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::Provider(format!("invalid JWKS document: {e}")))?;

        *self.keys.write().await = Some(key_set.clone());
        Ok(key_set)
    }

    async fn key_set(&self) -> Result<Option<JwkSet>> {
        Ok(self.keys.read().await.clone())
    }

    fn decode_claims(&self, id_token: &str, key: &DecodingKey) -> Result<IdentityClaims> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<IdentityClaims>(id_token, key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(data.claims)
    }
}

#[async_trait]
impl IdTokenVerifier for RemoteJwksVerifier {
    async fn verify(&self, id_token: &str) -> Result<IdentityClaims> {
        let header =
            decode_header(id_token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing key id".to_string()))?;

        // Cached set first; an unknown kid gets one refresh for key rotation.
        let cached = self.key_set().await?;
        let jwk = match cached.as_ref().and_then(|set| set.find(&kid).cloned()) {
            Some(jwk) => jwk,
            None => self
                .fetch_key_set()
                .await?
                .find(&kid)
                .cloned()
                .ok_or_else(|| AuthError::InvalidToken(format!("unknown key id: {kid}")))?,
        };

        let key =
            DecodingKey::from_jwk(&jwk).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        self.decode_claims(id_token, &key)
    }
}
