use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cryptographically random session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PKCE material persisted between the login redirect and the callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLogin {
    pub verifier: String,
    pub state: String,
    pub nonce: String,
    pub created_at: DateTime<Utc>,
}

/// Identity claims kept on an established session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Token state of an established session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub is_logged_in: bool,
    pub access_token: String,
    pub id_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Absolute expiry of the access/ID tokens, epoch seconds.
    pub token_expiry: i64,
    pub user_info: UserInfo,
}

/// Server-side session record. One record per session id; the callback
/// overwrites the pending phase with the active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionData {
    PendingLogin(PendingLogin),
    Active(ActiveSession),
}

/// Token endpoint response (authorization-code and refresh grants).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Claims decoded from a verified ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
}

impl From<&IdentityClaims> for UserInfo {
    fn from(claims: &IdentityClaims) -> Self {
        Self {
            sub: claims.sub.clone(),
            email: claims.email.clone(),
            given_name: claims.given_name.clone(),
            family_name: claims.family_name.clone(),
            picture: claims.picture.clone(),
        }
    }
}

/// The authenticated caller, as resolved from verified claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

fn display_name(given: Option<&str>, family: Option<&str>) -> String {
    let name = format!(
        "{} {}",
        given.unwrap_or_default(),
        family.unwrap_or_default()
    );
    let name = name.trim();
    if name.is_empty() {
        "Unknown User".to_string()
    } else {
        name.to_string()
    }
}

impl From<&UserInfo> for UserContext {
    fn from(info: &UserInfo) -> Self {
        Self {
            user_id: info.sub.clone(),
            email: info.email.clone().unwrap_or_default(),
            name: display_name(info.given_name.as_deref(), info.family_name.as_deref()),
        }
    }
}

impl From<&IdentityClaims> for UserContext {
    fn from(claims: &IdentityClaims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            email: claims.email.clone().unwrap_or_default(),
            name: display_name(claims.given_name.as_deref(), claims.family_name.as_deref()),
        }
    }
}
