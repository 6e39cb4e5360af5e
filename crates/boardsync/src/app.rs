use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        boards::{create_board, delete_board, get_board, list_boards, update_board},
        cards::{create_card, delete_card, list_cards, update_card},
        health::health,
        lists::{create_list, delete_list, list_lists, update_list},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Resource routes with CORS
    let api_routes = Router::new()
        .route("/boards", get(list_boards).post(create_board))
        .route(
            "/boards/{boardId}",
            get(get_board).put(update_board).delete(delete_board),
        )
        .route(
            "/boards/{boardId}/lists",
            get(list_lists).post(create_list),
        )
        .route(
            "/boards/{boardId}/lists/{listId}",
            put(update_list).delete(delete_list),
        )
        .route(
            "/boards/{boardId}/lists/{listId}/cards",
            get(list_cards).post(create_card),
        )
        .route(
            "/boards/{boardId}/lists/{listId}/cards/{cardId}",
            put(update_card).delete(delete_card),
        )
        .route("/health", get(health))
        .layer(cors);

    // Main application router
    Router::new()
        .nest("/api", api_routes)
        .merge(boardsync_auth::auth_routes().with_state(state.auth.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use boardsync_auth::{AuthConfig, AuthState, InMemorySessionStore};
    use boardsync_core::auth::{
        AuthError as CoreAuthError, IdTokenVerifier, IdentityClaims, OidcProviderClient,
        Result as CoreResult, TokenSet,
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;
    use url::Url;

    /// Provider stub; the resource API tests never reach the provider.
    struct StubProvider;

    #[async_trait]
    impl OidcProviderClient for StubProvider {
        fn authorization_url(&self, _challenge: &str, _state: &str, _nonce: &str) -> Url {
            "https://idp.example.com/oauth2/authorize".parse().unwrap()
        }

        async fn exchange_code(&self, _code: &str, _verifier: &str) -> CoreResult<TokenSet> {
            Err(CoreAuthError::CodeExchange("not wired in tests".into()))
        }

        async fn refresh_tokens(&self, _refresh_token: &str) -> CoreResult<TokenSet> {
            Err(CoreAuthError::CodeExchange("not wired in tests".into()))
        }

        fn end_session_url(&self) -> Url {
            "https://idp.example.com/logout".parse().unwrap()
        }
    }

    /// Verifier stub: a bearer token `token-<sub>` authenticates as `<sub>`.
    struct StubVerifier;

    #[async_trait]
    impl IdTokenVerifier for StubVerifier {
        async fn verify(&self, id_token: &str) -> CoreResult<IdentityClaims> {
            let sub = id_token
                .strip_prefix("token-")
                .ok_or_else(|| CoreAuthError::InvalidToken("bad signature".to_string()))?;
            Ok(IdentityClaims {
                sub: sub.to_string(),
                email: Some(format!("{sub}@example.com")),
                given_name: Some("Test".to_string()),
                family_name: Some("User".to_string()),
                picture: None,
                nonce: None,
            })
        }
    }

    fn test_auth_config() -> AuthConfig {
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

    fn test_app() -> Router {
        let auth = AuthState::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(StubProvider),
            Arc::new(StubVerifier),
            test_auth_config(),
        );
        let state = AppState::new(Arc::new(InMemoryStore::new()), auth);
        create_app(state)
    }

    fn request(method: &str, uri: &str, user: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer token-{user}"));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_board_as(app: &Router, user: &str, title: &str) -> String {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/boards",
                Some(user),
                Some(serde_json::json!({ "title": title })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_list_in(app: &Router, user: &str, board_id: &str, title: &str) -> String {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/api/boards/{board_id}/lists"),
                Some(user),
                Some(serde_json::json!({ "title": title })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_card_in(app: &Router, user: &str, board_id: &str, list_id: &str, title: &str) -> String {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/api/boards/{board_id}/lists/{list_id}/cards"),
                Some(user),
                Some(serde_json::json!({ "title": title })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = app
            .oneshot(request("GET", "/api/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_unauthenticated_request_is_401_envelope() {
        let app = test_app();
        let response = app
            .oneshot(request("GET", "/api/boards", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "AUTH_REQUIRED");
    }

    #[tokio::test]
    async fn test_create_board_stamps_matching_timestamps() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/boards",
                Some("u1"),
                Some(serde_json::json!({ "title": "Sprint 1" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["title"], "Sprint 1");
        assert_eq!(json["data"]["createdAt"], json["data"]["updatedAt"]);
    }

    #[tokio::test]
    async fn test_created_ids_are_unique() {
        let app = test_app();
        let first = create_board_as(&app, "u1", "One").await;
        let second = create_board_as(&app, "u1", "Two").await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_create_board_with_empty_title_is_validation_error() {
        let app = test_app();
        let response = app
            .oneshot(request(
                "POST",
                "/api/boards",
                Some("u1"),
                Some(serde_json::json!({ "title": "" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["message"], "Invalid request data");
    }

    #[tokio::test]
    async fn test_list_boards_empty_is_empty_array() {
        let app = test_app();
        let response = app
            .oneshot(request("GET", "/api/boards", Some("u1"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_board_lifecycle_across_users() {
        let app = test_app();
        let board_id = create_board_as(&app, "u1", "Sprint 1").await;

        // Another user cannot see the board; the key lookup under their own
        // partition misses, indistinguishable from a missing board.
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/boards/{board_id}"),
                Some("u2"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // On nested routes the ownership chain answers 403.
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/boards/{board_id}/lists"),
                Some("u2"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "ACCESS_DENIED");

        // The owner deletes it.
        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/boards/{board_id}"),
                Some("u1"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["deleted"], true);

        // Subsequent GET is 404.
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/boards/{board_id}"),
                Some("u1"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Deleting twice is safe: the second call is also 404.
        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/boards/{board_id}"),
                Some("u1"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_board_merges_only_present_fields() {
        let app = test_app();
        let board_id = create_board_as(&app, "u1", "Sprint 1").await;

        // Set a description without touching the title.
        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/boards/{board_id}"),
                Some("u1"),
                Some(serde_json::json!({ "description": "Iteration one" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["title"], "Sprint 1");
        assert_eq!(json["data"]["description"], "Iteration one");
    }

    #[tokio::test]
    async fn test_update_missing_board_is_404() {
        let app = test_app();
        let response = app
            .oneshot(request(
                "PUT",
                "/api/boards/00000000-0000-0000-0000-000000000000",
                Some("u1"),
                Some(serde_json::json!({ "title": "New" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_lists_default_order_is_sibling_count() {
        let app = test_app();
        let board_id = create_board_as(&app, "u1", "Sprint 1").await;

        create_list_in(&app, "u1", &board_id, "Todo").await;
        create_list_in(&app, "u1", &board_id, "Doing").await;

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/boards/{board_id}/lists"),
                Some("u1"),
                None,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        let lists = json["data"].as_array().unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0]["order"], 0);
        assert_eq!(lists[1]["order"], 1);
    }

    #[tokio::test]
    async fn test_delete_board_cascades_to_lists_and_cards() {
        use boardsync_core::storage::{keys, KeyedStore};
        use uuid::Uuid;

        let store = Arc::new(InMemoryStore::new());
        let auth = AuthState::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(StubProvider),
            Arc::new(StubVerifier),
            test_auth_config(),
        );
        let app = create_app(AppState::new(store.clone(), auth));

        let board_id = create_board_as(&app, "u1", "Sprint 1").await;
        let list_id = create_list_in(&app, "u1", &board_id, "Todo").await;
        create_card_in(&app, "u1", &board_id, &list_id, "Task A").await;

        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/boards/{board_id}"),
                Some("u1"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The list and card partitions are gone along with the board.
        let board_uuid: Uuid = board_id.parse().unwrap();
        let list_uuid: Uuid = list_id.parse().unwrap();
        let lists = store
            .query(&keys::board_pk(board_uuid), Some(keys::LIST_PREFIX))
            .await
            .unwrap();
        assert!(lists.is_empty());
        let cards = store
            .query(&keys::list_pk(list_uuid), Some(keys::CARD_PREFIX))
            .await
            .unwrap();
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn test_card_lifecycle_with_sparse_update() {
        let app = test_app();
        let board_id = create_board_as(&app, "u1", "Sprint 1").await;
        let list_id = create_list_in(&app, "u1", &board_id, "Todo").await;

        // New cards default to status "open" and sibling-count order.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/api/boards/{board_id}/lists/{list_id}/cards"),
                Some("u1"),
                Some(serde_json::json!({ "title": "Task A", "description": "First" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let card_id = json["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(json["data"]["status"], "open");
        assert_eq!(json["data"]["order"], 0);

        // Update the status only; title and description survive.
        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/boards/{board_id}/lists/{list_id}/cards/{card_id}"),
                Some("u1"),
                Some(serde_json::json!({ "status": "in-progress" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "in-progress");
        assert_eq!(json["data"]["title"], "Task A");
        assert_eq!(json["data"]["description"], "First");

        // Delete, then delete again: second is 404, no crash.
        let uri = format!("/api/boards/{board_id}/lists/{list_id}/cards/{card_id}");
        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some("u1"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some("u1"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_move_card_between_lists() {
        let app = test_app();
        let board_id = create_board_as(&app, "u1", "Sprint 1").await;
        let todo = create_list_in(&app, "u1", &board_id, "Todo").await;
        let done = create_list_in(&app, "u1", &board_id, "Done").await;
        let card_id = create_card_in(&app, "u1", &board_id, &todo, "Task A").await;

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/boards/{board_id}/lists/{todo}/cards/{card_id}"),
                Some("u1"),
                Some(serde_json::json!({ "listId": done, "status": "done" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["listId"], done.as_str());
        assert_eq!(json["data"]["status"], "done");

        // Gone from the old list, present in the new one.
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/boards/{board_id}/lists/{todo}/cards"),
                Some("u1"),
                None,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"], serde_json::json!([]));

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/boards/{board_id}/lists/{done}/cards"),
                Some("u1"),
                None,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_move_card_to_unknown_list_is_404() {
        let app = test_app();
        let board_id = create_board_as(&app, "u1", "Sprint 1").await;
        let todo = create_list_in(&app, "u1", &board_id, "Todo").await;
        let card_id = create_card_in(&app, "u1", &board_id, &todo, "Task A").await;

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/boards/{board_id}/lists/{todo}/cards/{card_id}"),
                Some("u1"),
                Some(serde_json::json!({
                    "listId": "00000000-0000-0000-0000-000000000000"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // The card is still where it was.
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/boards/{board_id}/lists/{todo}/cards"),
                Some("u1"),
                None,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cards_under_unknown_list_is_404() {
        let app = test_app();
        let board_id = create_board_as(&app, "u1", "Sprint 1").await;

        let response = app
            .oneshot(request(
                "GET",
                &format!(
                    "/api/boards/{board_id}/lists/00000000-0000-0000-0000-000000000000/cards"
                ),
                Some("u1"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
