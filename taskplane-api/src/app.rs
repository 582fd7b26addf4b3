/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskplane_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskplane_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskplane_shared::auth::middleware;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the domain the refresh cookie is scoped to
    pub fn cookie_domain(&self) -> &str {
        &self.config.cookie.domain
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /auth/                         # Authentication (public, cookie-bearing)
/// │   ├── POST /login
/// │   ├── POST /register
/// │   ├── POST /refresh-token
/// │   └── POST /logout
/// └── /users/                        # Profile (requires bearer access token)
///     ├── GET /current-user/profile
///     └── PUT /current-user
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer, credentials on so the cookie crosses origins)
/// 3. Bearer authentication (user routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public; session state travels in the refresh cookie)
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/register", post(routes::auth::register))
        .route("/refresh-token", post(routes::auth::refresh_token))
        .route("/logout", post(routes::auth::logout));

    // User routes (require a bearer access token)
    let user_routes = Router::new()
        .route("/current-user/profile", get(routes::users::profile))
        .route("/current-user", put(routes::users::update_profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: explicit origins; credentials must be allowed for
        // the refresh cookie to be sent cross-site
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer authentication middleware layer
///
/// Validates the access token from the Authorization header and injects an
/// AuthContext into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_context = middleware::bearer_auth_context(req.headers(), state.jwt_secret())?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
