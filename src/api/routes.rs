//! API routes

use crate::api::docs::{docs_page, openapi_json, DOCS_PATH, OPENAPI_PATH};
use crate::api::handlers::{
    delete_user, get_user, list_users, patch_user, update_user, AppState,
};
use crate::auth::handlers::{login, register};
use crate::auth::middleware::authenticate;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route(DOCS_PATH, get(docs_page))
        .route(OPENAPI_PATH, get(openapi_json));

    // Listing always needs a token
    let protected_routes = Router::new()
        .route("/api/users", get(list_users))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let mut user_routes = Router::new().route(
        "/api/users/:id",
        get(get_user)
            .put(update_user)
            .patch(patch_user)
            .delete(delete_user),
    );
    if state.protect_user_routes {
        user_routes =
            user_routes.layer(middleware::from_fn_with_state(state.clone(), authenticate));
    }

    public_routes
        .merge(protected_routes)
        .merge(user_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::docs::ENDPOINTS;
    use crate::api::models::UserSummary;
    use crate::core::config::SecurityConfig;
    use axum::{
        body::Body,
        extract::Request,
        http::{header, Method, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt; // For oneshot method

    fn security(protect_user_routes: bool) -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "routes-secret".to_string(),
            token_ttl: 3600,
            bcrypt_cost: 4,
            allowed_origins: vec!["*".to_string()],
            protect_user_routes,
        }
    }

    struct TestApp {
        state: AppState,
    }

    struct TestResponse {
        status: StatusCode,
        body: String,
    }

    impl TestResponse {
        fn json(&self) -> Value {
            serde_json::from_str(&self.body).unwrap()
        }
    }

    impl TestApp {
        fn new() -> Self {
            Self::with_security(security(false))
        }

        fn with_security(security: SecurityConfig) -> Self {
            Self {
                state: AppState::new(&security),
            }
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            body: Option<Value>,
            token: Option<&str>,
        ) -> TestResponse {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let body = match body {
                Some(value) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(value.to_string())
                }
                None => Body::empty(),
            };

            let response = build_api_routes(self.state.clone())
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap();

            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            TestResponse {
                status,
                body: String::from_utf8(bytes.to_vec()).unwrap(),
            }
        }

        async fn register(&self, username: &str, password: &str) -> UserSummary {
            let response = self
                .send(
                    Method::POST,
                    "/api/register",
                    Some(json!({ "username": username, "password": password })),
                    None,
                )
                .await;
            assert_eq!(response.status, StatusCode::CREATED);
            serde_json::from_str(&response.body).unwrap()
        }

        async fn login(&self, username: &str, password: &str) -> TestResponse {
            self.send(
                Method::POST,
                "/api/login",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await
        }

        async fn token_for(&self, username: &str, password: &str) -> String {
            let response = self.login(username, password).await;
            assert_eq!(response.status, StatusCode::OK);
            response.json()["token"].as_str().unwrap().to_string()
        }
    }

    #[tokio::test]
    async fn test_register_login_list_round_trip() {
        let app = TestApp::new();
        let alice = app.register("alice", "pw").await;
        assert_eq!(alice.username, "alice");

        let token = app.token_for("alice", "pw").await;

        let response = app.send(Method::GET, "/api/users", None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::OK);
        let users: Vec<UserSummary> = serde_json::from_str(&response.body).unwrap();
        assert!(users.contains(&UserSummary { id: alice.id, username: "alice".to_string() }));
    }

    #[tokio::test]
    async fn test_register_response_shape() {
        let app = TestApp::new();
        let response = app
            .send(
                Method::POST,
                "/api/register",
                Some(json!({ "username": "bob", "password": "pw" })),
                None,
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.json(), json!({ "id": 1, "username": "bob" }));
    }

    #[tokio::test]
    async fn test_list_requires_token() {
        let app = TestApp::new();
        app.register("alice", "pw").await;

        let response = app.send(Method::GET, "/api/users", None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body, "Unauthorized");

        let response = app
            .send(Method::GET, "/api/users", None, Some("garbage"))
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.body, "Forbidden");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let app = TestApp::new();
        app.register("alice", "pw").await;

        let response = app.login("nobody", "pw").await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body, "Invalid credentials");

        let response = app.login("alice", "wrong").await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_duplicate_usernames_log_in_as_first() {
        let app = TestApp::new();
        let first = app.register("twin", "one").await;
        let second = app.register("twin", "two").await;
        assert_ne!(first.id, second.id);

        assert_eq!(app.login("twin", "one").await.status, StatusCode::OK);
        assert_eq!(app.login("twin", "two").await.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_is_idempotent() {
        let app = TestApp::new();
        let user = app.register("alice", "pw").await;
        let uri = format!("/api/users/{}", user.id);

        let first = app.send(Method::GET, &uri, None, None).await;
        let second = app.send(Method::GET, &uri, None, None).await;

        assert_eq!(first.status, StatusCode::OK);
        assert_eq!(first.body, second.body);
        assert_eq!(first.json(), json!({ "id": user.id, "username": "alice" }));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found_everywhere() {
        let app = TestApp::new();
        app.register("alice", "pw").await;

        for method in [Method::GET, Method::PUT, Method::PATCH, Method::DELETE] {
            let body = if method == Method::PUT || method == Method::PATCH {
                Some(json!({ "name": "x" }))
            } else {
                None
            };
            let response = app
                .send(method.clone(), "/api/users/99999", body, None)
                .await;
            assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", method);
            assert_eq!(response.body, "User not found");
        }
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        let app = TestApp::new();
        let response = app.send(Method::GET, "/api/users/abc", None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_id_with_trailing_garbage_addresses_leading_number() {
        let app = TestApp::new();
        let user = app.register("alice", "pw").await;

        for path in [format!("/api/users/{}abc", user.id), format!("/api/users/{}.5", user.id)] {
            let response = app.send(Method::GET, &path, None, None).await;
            assert_eq!(response.status, StatusCode::OK, "{}", path);
            assert_eq!(response.json(), json!({ "id": user.id, "username": "alice" }));
        }

        let response = app
            .send(
                Method::PATCH,
                &format!("/api/users/{}xyz", user.id),
                Some(json!({ "name": "bob" })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, format!("User {} partially updated to bob", user.id));
    }

    #[tokio::test]
    async fn test_put_replaces_username() {
        let app = TestApp::new();
        let user = app.register("alice", "pw").await;
        let uri = format!("/api/users/{}", user.id);

        let response = app
            .send(Method::PUT, &uri, Some(json!({ "name": "alicia" })), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, format!("User {} updated to alicia", user.id));

        let fetched = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(fetched.json()["username"], "alicia");
    }

    #[tokio::test]
    async fn test_put_without_name_clears_username() {
        let app = TestApp::new();
        let user = app.register("alice", "pw").await;
        let uri = format!("/api/users/{}", user.id);

        let response = app.send(Method::PUT, &uri, Some(json!({})), None).await;
        assert_eq!(response.status, StatusCode::OK);

        let fetched = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(fetched.json()["username"], "");
    }

    #[tokio::test]
    async fn test_patch_with_empty_body_keeps_username() {
        let app = TestApp::new();
        let user = app.register("alice", "pw").await;
        let uri = format!("/api/users/{}", user.id);

        let response = app.send(Method::PATCH, &uri, None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body,
            format!("User {} partially updated to alice", user.id)
        );

        let response = app
            .send(Method::PATCH, &uri, Some(json!({ "name": "" })), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);

        let fetched = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(fetched.json()["username"], "alice");
    }

    #[tokio::test]
    async fn test_patch_with_name_updates() {
        let app = TestApp::new();
        let user = app.register("alice", "pw").await;
        let uri = format!("/api/users/{}", user.id);

        let response = app
            .send(Method::PATCH, &uri, Some(json!({ "name": "al" })), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);

        let fetched = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(fetched.json()["username"], "al");
    }

    #[tokio::test]
    async fn test_delete_is_final_and_ids_not_reused() {
        let app = TestApp::new();
        let user = app.register("alice", "pw").await;
        let uri = format!("/api/users/{}", user.id);

        let response = app.send(Method::DELETE, &uri, None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, format!("User {} deleted successfully", user.id));

        let response = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);

        let response = app.send(Method::DELETE, &uri, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);

        let later = app.register("bob", "pw").await;
        assert_ne!(later.id, user.id);
        assert!(later.id > user.id);
    }

    #[tokio::test]
    async fn test_renamed_user_logs_in_with_new_name() {
        let app = TestApp::new();
        let user = app.register("alice", "pw").await;
        app.send(
            Method::PUT,
            &format!("/api/users/{}", user.id),
            Some(json!({ "name": "alicia" })),
            None,
        )
        .await;

        assert_eq!(app.login("alice", "pw").await.status, StatusCode::UNAUTHORIZED);
        assert_eq!(app.login("alicia", "pw").await.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_password_hash_never_returned() {
        let app = TestApp::new();
        let user = app.register("alice", "pw").await;
        let hash = app
            .state
            .users
            .find_by_id(user.id)
            .await
            .unwrap()
            .password_hash;
        let token = app.token_for("alice", "pw").await;
        let uri = format!("/api/users/{}", user.id);

        let bodies = vec![
            app.send(
                Method::POST,
                "/api/register",
                Some(json!({ "username": "bob", "password": "pw" })),
                None,
            )
            .await
            .body,
            app.login("alice", "pw").await.body,
            app.send(Method::GET, "/api/users", None, Some(&token)).await.body,
            app.send(Method::GET, &uri, None, None).await.body,
            app.send(Method::PATCH, &uri, None, None).await.body,
            app.send(Method::PUT, &uri, Some(json!({ "name": "alice" })), None)
                .await
                .body,
            app.send(Method::GET, OPENAPI_PATH, None, None).await.body,
        ];

        for body in bodies {
            assert!(!body.contains(&hash));
            assert!(!body.contains("$2b$"));
            assert!(!body.contains("password_hash"));
        }
    }

    #[tokio::test]
    async fn test_register_without_fields_is_accepted() {
        let app = TestApp::new();
        let response = app.send(Method::POST, "/api/register", None, None).await;

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.json()["username"], "");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = TestApp::new();
        let response = build_api_routes(app.state.clone())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"username\": "))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(app.state.users.is_empty().await);
    }

    #[tokio::test]
    async fn test_by_id_routes_open_by_default() {
        let app = TestApp::new();
        let user = app.register("alice", "pw").await;

        let response = app
            .send(Method::GET, &format!("/api/users/{}", user.id), None, None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_by_id_routes_gated_when_configured() {
        let app = TestApp::with_security(security(true));
        let user = app.register("alice", "pw").await;
        let uri = format!("/api/users/{}", user.id);

        for method in [Method::GET, Method::PUT, Method::PATCH, Method::DELETE] {
            let response = app.send(method.clone(), &uri, None, None).await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", method);

            let response = app.send(method.clone(), &uri, None, Some("garbage")).await;
            assert_eq!(response.status, StatusCode::FORBIDDEN, "{}", method);
        }

        let token = app.token_for("alice", "pw").await;
        let response = app.send(Method::GET, &uri, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::OK);

        // Registration and login stay open
        assert_eq!(app.login("alice", "pw").await.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_every_documented_endpoint_is_routed() {
        let app = TestApp::new();

        for endpoint in ENDPOINTS {
            let uri = endpoint.path.replace("{id}", "99999");
            let method = Method::from_bytes(endpoint.method.to_uppercase().as_bytes()).unwrap();
            let response = app.send(method, &uri, None, None).await;

            assert_ne!(
                response.status,
                StatusCode::METHOD_NOT_ALLOWED,
                "{} {}",
                endpoint.method,
                endpoint.path
            );
            // The router's own 404 has an empty body
            assert!(
                !(response.status == StatusCode::NOT_FOUND && response.body.is_empty()),
                "{} {} is not routed",
                endpoint.method,
                endpoint.path
            );
        }
    }

    #[tokio::test]
    async fn test_docs_served() {
        let app = TestApp::new();

        let response = app.send(Method::GET, OPENAPI_PATH, None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json()["openapi"], "3.0.0");

        let response = app.send(Method::GET, DOCS_PATH, None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains(OPENAPI_PATH));
    }
}
