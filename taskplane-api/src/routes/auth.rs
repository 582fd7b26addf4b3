/// Authentication endpoints
///
/// Session flow: login/register verify or create credentials, then hand the
/// client a short-lived access token in the body and a 7-day refresh token
/// in an httpOnly cookie. Refresh rotates the whole pair from the cookie;
/// logout clears the cookie (there is no server-side session state).
///
/// # Endpoints
///
/// - `POST /auth/login` - Verify credentials, issue a token pair
/// - `POST /auth/register` - Create an account, issue a token pair
/// - `POST /auth/refresh-token` - Rotate the pair from the refresh cookie
/// - `POST /auth/logout` - Clear the refresh cookie

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::users::PublicUser,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use taskplane_shared::{
    auth::{cookie, jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Login/register request body
#[derive(Debug, Deserialize, Validate)]
pub struct AuthRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password, hashed before it ever reaches storage
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Response shape shared by login, register, and refresh
///
/// The refresh token is deliberately absent: it travels only in the cookie.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Authenticated user, without the password hash
    pub user: PublicUser,

    /// Bearer credential for API calls (1 hour)
    pub access_token: String,
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret123" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: unknown email or wrong password; the same status for
///   both, so the response does not reveal which check failed
/// - `422 Unprocessable Entity`: validation failed
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<AuthRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    req.validate()?;

    // Find user by email
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invalid email or password".to_string()))?;

    // Verify password
    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::NotFound("Invalid email or password".to_string()));
    }

    // Issue tokens and attach the refresh cookie
    let pair = jwt::issue_token_pair(user.id, state.jwt_secret())?;
    let jar = jar.add(cookie::refresh_token_cookie(
        &pair.refresh_token,
        state.cookie_domain(),
    ));

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        Json(AuthResponse {
            user: user.into(),
            access_token: pair.access_token,
        }),
    ))
}

/// Register endpoint
///
/// Creates a user with an empty display name; the name is set later through
/// the profile update endpoint.
///
/// # Errors
///
/// - `400 Bad Request`: email already registered
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<AuthRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    req.validate()?;

    // Reject duplicate registration up front; the unique index on email
    // catches the concurrent-registration race with the same 400
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    // Hash password
    let password_hash = password::hash_password(&req.password)?;

    // Create user
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            name: String::new(),
            password_hash,
        },
    )
    .await?;

    // Issue tokens and attach the refresh cookie
    let pair = jwt::issue_token_pair(user.id, state.jwt_secret())?;
    let jar = jar.add(cookie::refresh_token_cookie(
        &pair.refresh_token,
        state.cookie_domain(),
    ));

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            user: user.into(),
            access_token: pair.access_token,
        }),
    ))
}

/// Token refresh endpoint
///
/// Reads the refresh token from the `refreshToken` cookie and rotates the
/// whole pair: a new access token in the body, a new refresh token in the
/// cookie. Expired refresh tokens are rejected like any other invalid token.
///
/// # Errors
///
/// - `401 Unauthorized`: cookie missing (the cookie is also cleared), or
///   token invalid/expired
/// - `404 Not Found`: token subject no longer exists
pub async fn refresh_token(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Response> {
    // No cookie: clear whatever the client thinks it has and reject
    let Some(refresh_cookie) = jar.get(cookie::REFRESH_TOKEN_COOKIE) else {
        let jar = jar.add(cookie::clear_refresh_token_cookie(state.cookie_domain()));
        let err = ApiError::Unauthorized("Refresh token not passed".to_string());
        return Ok((jar, err).into_response());
    };

    // Validate the refresh token (signature, expiration, token type)
    let claims = jwt::validate_refresh_token(refresh_cookie.value(), state.jwt_secret())?;

    // The subject must still exist
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Rotate the pair
    let pair = jwt::issue_token_pair(user.id, state.jwt_secret())?;
    let jar = jar.add(cookie::refresh_token_cookie(
        &pair.refresh_token,
        state.cookie_domain(),
    ));

    tracing::debug!(user_id = %user.id, "Refresh token rotated");

    Ok((
        jar,
        Json(AuthResponse {
            user: user.into(),
            access_token: pair.access_token,
        }),
    )
        .into_response())
}

/// Logout endpoint
///
/// Clears the refresh cookie. Tokens already issued stay valid until they
/// expire; there is no server-side revocation store.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (StatusCode, CookieJar, Json<bool>) {
    let jar = jar.add(cookie::clear_refresh_token_cookie(state.cookie_domain()));

    (StatusCode::CREATED, jar, Json(true))
}
