/// Bearer authentication for protected routes
///
/// The API layer calls [`bearer_auth_context`] from an Axum middleware,
/// then inserts the resulting [`AuthContext`] into request extensions;
/// handlers extract it with Axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskplane_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};

/// Authentication context added to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (the access token's `sub` claim)
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context from a validated access token subject
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Error type for the bearer authentication path
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// Validates the `Authorization: Bearer <token>` header of a request
///
/// Expiration is enforced; an expired access token must be refreshed, not
/// accepted.
///
/// # Errors
///
/// - `MissingCredentials` if the header is absent
/// - `InvalidFormat` if it is not a Bearer credential
/// - `InvalidToken` if validation fails (bad signature, expired, or a
///   refresh token presented as a bearer credential)
pub fn bearer_auth_context(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    Ok(AuthContext::new(claims.sub))
}
