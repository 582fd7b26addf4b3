/// Common test utilities for integration tests
///
/// These tests require a running PostgreSQL database; set DATABASE_URL and
/// JWT_SECRET (any >= 32 byte string) in the environment or a .env file.
///
/// The context builds the real router once per test and drives it in-process
/// via tower, so the full middleware stack (auth layer, cookies, CORS) is
/// exercised without binding a socket.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use taskplane_api::app::{build_router, AppState};
use taskplane_api::config::Config;
use tower::ServiceExt;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: sqlx::PgPool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context against the configured test database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = sqlx::PgPool::connect(&config.database.url).await?;
        taskplane_shared::db::migrations::run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(Self { db, app, config })
    }

    /// Sends a request through the full router
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Router should produce a response")
    }
}

/// Generates an email no other test run has registered
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

/// Builds a JSON POST request, optionally carrying a refresh cookie
pub fn post_json(uri: &str, body: &Value, refresh_cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = refresh_cookie {
        builder = builder.header(header::COOKIE, format!("refreshToken={}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// Reads a response body as JSON
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body should be readable");
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}

/// Extracts the `refreshToken` Set-Cookie header, if any
pub fn refresh_set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("refreshToken="))
        .map(|v| v.to_string())
}

/// Extracts the refresh token value from a Set-Cookie header string
pub fn cookie_value(set_cookie: &str) -> String {
    set_cookie
        .trim_start_matches("refreshToken=")
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Registers a fresh user, returning (response body, refresh token value)
pub async fn register_user(ctx: &TestContext, email: &str, password: &str) -> (Value, String) {
    let response = ctx
        .send(post_json(
            "/auth/register",
            &json!({ "email": email, "password": password }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let set_cookie = refresh_set_cookie(&response).expect("Register should set a refresh cookie");
    let token = cookie_value(&set_cookie);
    let body = body_json(response).await;

    (body, token)
}
