//! HTTP handlers for the auth routes.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use boardsync_core::auth::{
    code_challenge, generate_code_verifier, generate_nonce, generate_session_id, generate_state,
    needs_refresh, token_expiry, ActiveSession, AuthError as CoreError, PendingLogin, SessionData,
    SessionId, UserInfo,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::AuthError;
use crate::AuthState;

/// Query parameters for the OAuth callback.
#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Body of `GET /api/session`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub is_logged_in: bool,
    pub user_info: Option<UserInfo>,
}

/// Body of `POST /api/refresh-token`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub message: &'static str,
}

/// Creates the auth router with all authentication routes.
///
/// Routes:
/// - `GET /api/auth/login` - Redirect to the identity provider
/// - `GET /api/auth/callback` - Handle the provider callback (code exchange)
/// - `GET /api/auth/logout` - End the session here and at the provider
/// - `GET /api/session` - Current session state for the frontend
/// - `POST /api/refresh-token` - Force a valid access token
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/api/auth/login", get(login))
        .route("/api/auth/callback", get(callback))
        .route("/api/auth/logout", get(logout))
        .route("/api/session", get(session))
        .route("/api/refresh-token", post(refresh_token))
}

fn session_cookie(state: &AuthState, value: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((state.config.cookie_name.clone(), value))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age.as_secs() as i64))
        .build()
}

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AuthError> {
    let verifier = generate_code_verifier();
    let challenge = code_challenge(&verifier);
    let csrf_state = generate_state();
    let nonce = generate_nonce();

    // Persist the PKCE material under a short-lived session record.
    let session_id = generate_session_id();
    let pending = SessionData::PendingLogin(PendingLogin {
        verifier,
        state: csrf_state.clone(),
        nonce: nonce.clone(),
        created_at: Utc::now(),
    });
    state
        .sessions
        .put_session(&session_id, &pending, state.config.login_ttl)
        .await?;

    let auth_url = state
        .provider
        .authorization_url(&challenge, &csrf_state, &nonce);

    let jar = jar.add(session_cookie(
        &state,
        session_id.to_string(),
        state.config.login_ttl,
    ));

    Ok((jar, Redirect::to(auth_url.as_str())))
}

async fn callback(
    State(state): State<AuthState>,
    Query(params): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AuthError> {
    let cookie = jar
        .get(&state.config.cookie_name)
        .ok_or(CoreError::MissingSessionCookie)?;
    let session_id = SessionId::new(cookie.value().to_string());

    let pending = match state.sessions.get_session(&session_id).await? {
        Some(SessionData::PendingLogin(pending)) => pending,
        // Absent, expired, or already past the login phase.
        _ => return Err(CoreError::SessionExpired.into()),
    };

    let code = params.code.ok_or(CoreError::MissingCode)?;

    // State mismatch means replay or CSRF; the flow record is burned.
    if params.state.as_deref() != Some(pending.state.as_str()) {
        state.sessions.delete_session(&session_id).await?;
        return Err(CoreError::InvalidState.into());
    }

    let tokens = state
        .provider
        .exchange_code(&code, &pending.verifier)
        .await?;
    let id_token = tokens
        .id_token
        .clone()
        .ok_or_else(|| CoreError::InvalidToken("no ID token in response".to_string()))?;

    // Signature, issuer and audience are checked by the verifier; the nonce
    // is compared against the one issued at login.
    let claims = state.verifier.verify(&id_token).await?;
    if claims.nonce.as_deref() != Some(pending.nonce.as_str()) {
        return Err(CoreError::NonceMismatch.into());
    }

    let now = Utc::now();
    let active = SessionData::Active(ActiveSession {
        is_logged_in: true,
        access_token: tokens.access_token,
        id_token,
        refresh_token: tokens.refresh_token,
        token_expiry: token_expiry(now, tokens.expires_in),
        user_info: UserInfo::from(&claims),
    });
    state
        .sessions
        .put_session(&session_id, &active, state.config.session_ttl)
        .await?;

    tracing::info!(user = %claims.sub, "login completed");

    // Extend the cookie lifetime to match the established session.
    let jar = jar.add(session_cookie(
        &state,
        session_id.to_string(),
        state.config.session_ttl,
    ));

    Ok((
        jar,
        Redirect::to(state.config.login_redirect_uri.as_str()),
    ))
}

/// Resolves a session id to an active session, refreshing tokens when the
/// remaining lifetime has fallen below the configured buffer.
///
/// A failed refresh invalidates the session for this request only; the
/// stored record is never destroyed here. Concurrent refreshes for the same
/// session are not deduplicated; the session store tolerates the duplicate
/// overwrite.
pub(crate) async fn get_valid_session(
    state: &AuthState,
    session_id: &SessionId,
) -> Result<Option<ActiveSession>, AuthError> {
    let Some(SessionData::Active(mut session)) = state.sessions.get_session(session_id).await?
    else {
        return Ok(None);
    };

    let now = Utc::now();
    if !needs_refresh(session.token_expiry, now, state.config.refresh_buffer) {
        return Ok(Some(session));
    }

    let Some(refresh_token) = session.refresh_token.clone() else {
        return Ok(None);
    };

    match state.provider.refresh_tokens(&refresh_token).await {
        Ok(tokens) => {
            session.access_token = tokens.access_token;
            if let Some(id_token) = tokens.id_token {
                session.id_token = id_token;
            }
            if let Some(refreshed) = tokens.refresh_token {
                session.refresh_token = Some(refreshed);
            }
            session.token_expiry = token_expiry(now, tokens.expires_in);

            state
                .sessions
                .put_session(
                    session_id,
                    &SessionData::Active(session.clone()),
                    state.config.session_ttl,
                )
                .await?;

            Ok(Some(session))
        }
        Err(err) => {
            tracing::warn!(error = %err, "token refresh failed");
            Ok(None)
        }
    }
}

async fn session(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> Result<Json<SessionResponse>, AuthError> {
    let logged_out = SessionResponse {
        is_logged_in: false,
        user_info: None,
    };

    let Some(cookie) = jar.get(&state.config.cookie_name) else {
        return Ok(Json(logged_out));
    };
    let session_id = SessionId::new(cookie.value().to_string());

    match get_valid_session(&state, &session_id).await? {
        Some(session) => Ok(Json(SessionResponse {
            is_logged_in: true,
            user_info: Some(session.user_info),
        })),
        None => Ok(Json(logged_out)),
    }
}

async fn refresh_token(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> Result<Json<RefreshResponse>, AuthError> {
    let cookie = jar
        .get(&state.config.cookie_name)
        .ok_or(CoreError::NotLoggedIn)?;
    let session_id = SessionId::new(cookie.value().to_string());

    match get_valid_session(&state, &session_id).await? {
        Some(session) => Ok(Json(RefreshResponse {
            access_token: session.access_token,
            message: "Token refreshed successfully",
        })),
        None => Err(CoreError::NotLoggedIn.into()),
    }
}

async fn logout(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AuthError> {
    let Some(cookie) = jar.get(&state.config.cookie_name) else {
        return Ok((
            jar,
            Redirect::to(state.config.logout_redirect_uri.as_str()),
        ));
    };
    let session_id = SessionId::new(cookie.value().to_string());
    let session = state.sessions.get_session(&session_id).await?;

    let jar = jar.remove(Cookie::from(state.config.cookie_name.clone()));

    match session {
        Some(SessionData::Active(_)) => {
            state.sessions.delete_session(&session_id).await?;
            // Terminate the provider-side session as well.
            Ok((
                jar,
                Redirect::to(state.provider.end_session_url().as_str()),
            ))
        }
        _ => Ok((
            jar,
            Redirect::to(state.config.logout_redirect_uri.as_str()),
        )),
    }
}
