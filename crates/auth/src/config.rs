use std::time::Duration;

use url::Url;

use crate::error::AuthError;

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Identity provider hosted-UI domain, e.g.
    /// `https://myapp.auth.us-east-1.amazoncognito.com`.
    pub domain: Url,
    /// Token issuer for ID token verification, e.g.
    /// `https://cognito-idp.us-east-1.amazonaws.com/us-east-1_POOLID`.
    pub issuer: Url,
    pub client_id: String,
    pub scope: String,
    /// Where the provider redirects back to after login.
    pub redirect_uri: Url,
    /// Where the browser lands after a successful login.
    pub login_redirect_uri: Url,
    /// Where the browser lands after logout.
    pub logout_redirect_uri: Url,
    /// TTL of an established session (default 7 days).
    pub session_ttl: Duration,
    /// TTL of the pending-login record (default 5 minutes).
    pub login_ttl: Duration,
    /// Refresh tokens once remaining lifetime drops below this.
    pub refresh_buffer: Duration,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

fn env_duration(name: &str, default_secs: u64) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(default_secs))
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `COGNITO_DOMAIN`: hosted-UI domain (required)
    /// - `COGNITO_ISSUER_URL`: token issuer for JWT verification (required)
    /// - `COGNITO_CLIENT_ID`: OAuth client ID (required)
    /// - `APP_URL`: base URL of this application (default: `http://localhost:3000`)
    /// - `OAUTH_SCOPE`: requested scopes (default: `openid profile email`)
    /// - `SESSION_TTL_SECONDS`: established-session TTL (default: 604800, 7 days)
    /// - `LOGIN_SESSION_TTL_SECONDS`: pending-login TTL (default: 300)
    /// - `TOKEN_REFRESH_BUFFER_SECONDS`: refresh buffer (default: 300)
    /// - `COOKIE_SECURE`: whether to set the secure flag on cookies (default: true)
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a URL does not
    /// parse.
    pub fn from_env() -> Result<Self, AuthError> {
        let required = |name: &str| {
            std::env::var(name).map_err(|_| AuthError::Config(format!("{name} is required")))
        };
        let parse_url = |name: &str, value: String| {
            value
                .parse::<Url>()
                .map_err(|e| AuthError::Config(format!("{name} is not a valid URL: {e}")))
        };

        let domain = parse_url("COGNITO_DOMAIN", required("COGNITO_DOMAIN")?)?;
        let issuer = parse_url("COGNITO_ISSUER_URL", required("COGNITO_ISSUER_URL")?)?;
        let client_id = required("COGNITO_CLIENT_ID")?;

        let app_url = parse_url(
            "APP_URL",
            std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        )?;

        let scope = std::env::var("OAUTH_SCOPE")
            .unwrap_or_else(|_| "openid profile email".to_string());

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Ok(Self {
            redirect_uri: app_url
                .join("/api/auth/callback")
                .map_err(|e| AuthError::Config(e.to_string()))?,
            login_redirect_uri: app_url
                .join("/dashboard")
                .map_err(|e| AuthError::Config(e.to_string()))?,
            logout_redirect_uri: app_url,
            domain,
            issuer,
            client_id,
            scope,
            session_ttl: env_duration("SESSION_TTL_SECONDS", 7 * 24 * 60 * 60),
            login_ttl: env_duration("LOGIN_SESSION_TTL_SECONDS", 300),
            refresh_buffer: env_duration("TOKEN_REFRESH_BUFFER_SECONDS", 300),
            cookie_name: "sid".to_string(),
            cookie_secure,
        })
    }
}

/// Config for tests; points at addresses nothing listens on.
#[cfg(test)]
pub(crate) fn test_config() -> AuthConfig {
    AuthConfig {
        domain: "https://idp.example.com".parse().unwrap(),
        issuer: "https://issuer.example.com/pool".parse().unwrap(),
        client_id: "client-1".to_string(),
        scope: "openid profile email".to_string(),
        redirect_uri: "http://localhost:3000/api/auth/callback".parse().unwrap(),
        login_redirect_uri: "http://localhost:3000/dashboard".parse().unwrap(),
        logout_redirect_uri: "http://localhost:3000".parse().unwrap(),
        session_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        login_ttl: Duration::from_secs(300),
        refresh_buffer: Duration::from_secs(300),
        cookie_name: "sid".to_string(),
        cookie_secure: false,
    }
}
