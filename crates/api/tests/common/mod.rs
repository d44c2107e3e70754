//! Shared harness for HTTP-level integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) against
//! the per-test database that `#[sqlx::test]` provides, and offers small
//! request helpers on top of `tower::ServiceExt::oneshot`.

// Each test binary compiles this module independently and few use every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use hiperflow_api::auth::jwt::JwtConfig;
use hiperflow_api::auth::password::hash_password;
use hiperflow_api::config::ServerConfig;
use hiperflow_api::router::build_app_router;
use hiperflow_api::state::AppState;
use hiperflow_core::roles::ROLE_MEMBER;
use hiperflow_core::types::DbId;
use hiperflow_db::models::user::CreateUser;
use hiperflow_db::repositories::{RoleRepo, UserRepo};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and a fixed JWT secret so tokens minted in
/// one request validate in the next.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        public_base_url: "http://localhost:5173".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Delegates to the same `build_app_router` that `main.rs` uses, so tests
/// exercise the production middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery). The model client is left unset, which makes the
/// AI endpoints answer 503.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        model_client: None,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body, without authentication.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PUT request with a JSON body and a bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Account fixtures
// ---------------------------------------------------------------------------

/// Password used by all fixture accounts.
pub const TEST_PASSWORD: &str = "s3cure-enough-for-tests";

/// Register a fresh team through the public endpoint.
///
/// The first registered user becomes the team admin. Returns the parsed auth
/// response (`access_token`, `refresh_token`, `expires_in`, `user`).
pub async fn register_team(pool: &PgPool, team_name: &str, username: &str) -> serde_json::Value {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "team_name": team_name,
            "username": username,
            "email": format!("{username}@example.com"),
            "password": TEST_PASSWORD,
        }),
    )
    .await;
    assert_eq!(
        response.status(),
        StatusCode::CREATED,
        "registration of {username} should succeed"
    );
    body_json(response).await
}

/// Log in with the given credentials, asserting success.
///
/// Returns the parsed auth response.
pub async fn login(pool: &PgPool, username: &str, password: &str) -> serde_json::Value {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": username, "password": password}),
    )
    .await;
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "login of {username} should succeed"
    );
    body_json(response).await
}

/// Insert a member-role user into an existing team, bypassing the HTTP API
/// (registration always creates a new team with an admin).
///
/// The account uses [`TEST_PASSWORD`]; log in through HTTP to get a token.
pub async fn create_member(pool: &PgPool, team_id: DbId, username: &str) -> DbId {
    let role = RoleRepo::find_by_name(pool, ROLE_MEMBER)
        .await
        .unwrap()
        .expect("member role is seeded by migrations");
    let password_hash = hash_password(TEST_PASSWORD).unwrap();
    let user = UserRepo::create(
        pool,
        &CreateUser {
            team_id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash,
            role_id: role.id,
        },
    )
    .await
    .unwrap();
    user.id
}

/// Extract the access token from an auth response body.
pub fn token_of(auth: &serde_json::Value) -> String {
    auth["access_token"]
        .as_str()
        .expect("auth response must contain access_token")
        .to_string()
}
