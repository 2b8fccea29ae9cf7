#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use uuid::Uuid;

use clienter_api::auth::jwt::{AuthConfig, Claims};
use clienter_api::config::ServerConfig;
use clienter_api::router::build_app_router;
use clienter_api::state::AppState;
use clienter_api::ws::WsManager;
use clienter_reminders::ReminderConfig;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        auth: AuthConfig {
            secret: TEST_SECRET.to_string(),
            audience: "authenticated".to_string(),
        },
        reminders: ReminderConfig::default(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::new(WsManager::new()),
        shutdown: CancellationToken::new(),
    };
    build_app_router(state, &config)
}

/// Mint an access token the way the auth provider would.
pub fn token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id,
        aud: "authenticated".to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        email: Some(format!("{user_id}@example.com")),
        role: Some("authenticated".to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<Uuid>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("authorization", format!("Bearer {}", token_for(user)));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, user: Uuid) -> Response<Body> {
    send(app, Method::GET, uri, Some(user), None).await
}

pub async fn post_as(app: Router, uri: &str, user: Uuid) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), None).await
}

pub async fn post_json_as(
    app: Router,
    uri: &str,
    user: Uuid,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), Some(body)).await
}

pub async fn put_json_as(
    app: Router,
    uri: &str,
    user: Uuid,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(user), Some(body)).await
}

pub async fn delete_as(app: Router, uri: &str, user: Uuid) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
