//! Axum extractors for the authenticated caller.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use boardsync_core::auth::{SessionId, UserContext};

use crate::handlers::get_valid_session;
use crate::AuthState;

/// Rejection for failed authentication, rendered in the API envelope.
#[derive(Debug)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "error": {
                "message": "Authentication required",
                "code": "AUTH_REQUIRED",
            }
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Extractor for the authenticated caller. Returns 401 if the request
/// carries neither a verifiable bearer token nor an active session.
///
/// A bearer ID token stands in for the deployment's external authorizer:
/// the handler trusts verified token claims and performs no local
/// credential validation.
pub struct CurrentUser(pub UserContext);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        // Authorization header first (API clients).
        if let Some(auth_header) = parts.headers.get(AUTHORIZATION) {
            let header_value = auth_header.to_str().map_err(|_| AuthRejection)?;
            let token = header_value.strip_prefix("Bearer ").ok_or(AuthRejection)?;

            let claims = auth_state
                .verifier
                .verify(token)
                .await
                .map_err(|_| AuthRejection)?;

            return Ok(CurrentUser(UserContext::from(&claims)));
        }

        // Fall back to the session cookie (web clients).
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar
            .get(&auth_state.config.cookie_name)
            .ok_or(AuthRejection)?;
        let session_id = SessionId::new(cookie.value().to_string());

        let session = get_valid_session(&auth_state, &session_id)
            .await
            .map_err(|_| AuthRejection)?
            .ok_or(AuthRejection)?;

        Ok(CurrentUser(UserContext::from(&session.user_info)))
    }
}
