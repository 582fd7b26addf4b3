/// Token issuance and validation
///
/// Taskplane sessions are carried by two independently signed JWTs: a
/// short-lived access token presented as a bearer credential, and a
/// longer-lived refresh token exchanged (and rotated) via an HTTP cookie.
/// The identity payload of both tokens is the user id alone.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC-SHA256) over a shared secret
/// - **Expiration**: 1 hour for access tokens, 7 days for refresh tokens
/// - **Validation**: signature, expiration, nbf, and issuer checks, for
///   refresh tokens as well as access tokens
/// - **Type confusion**: each token carries a `token_type` claim, so an
///   access token can never be exchanged as a refresh token or vice versa
///
/// # Example
///
/// ```
/// use taskplane_shared::auth::jwt::{issue_token_pair, validate_access_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let pair = issue_token_pair(user_id, "secret-key-at-least-32-bytes-long")?;
///
/// let claims = validate_access_token(&pair.access_token, "secret-key-at-least-32-bytes-long")?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer claim value
const ISSUER: &str = "taskplane";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is of the wrong type for this operation
    #[error("Wrong token type: expected {expected}")]
    WrongTokenType { expected: &'static str },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived, 1 hour)
    Access,

    /// Refresh token (longer-lived, 7 days)
    Refresh,
}

impl TokenType {
    /// Gets the signed lifetime for this token type
    pub fn lifetime(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(1),
            TokenType::Refresh => Duration::days(7),
        }
    }

    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims
///
/// The only identity carried is `sub` (the user id); the rest are standard
/// bookkeeping claims plus the `token_type` discriminator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "taskplane"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims with the default lifetime for the token type
    pub fn new(user_id: Uuid, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, token_type, token_type.lifetime())
    }

    /// Creates claims with a custom expiration
    ///
    /// Mostly useful in tests, e.g. to mint an already-expired token with a
    /// negative duration.
    pub fn with_expiration(user_id: Uuid, token_type: TokenType, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
            token_type,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// A freshly issued access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Bearer credential, 1 hour
    pub access_token: String,

    /// Cookie credential, 7 days
    pub refresh_token: String,
}

/// Creates a signed token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a new access/refresh token pair for a user
///
/// Both tokens are signed independently with their own lifetimes. This is
/// the single issuance path used by login, register, and refresh, so a
/// refresh always rotates the refresh token as well.
pub fn issue_token_pair(user_id: Uuid, secret: &str) -> Result<TokenPair, JwtError> {
    let access_claims = Claims::new(user_id, TokenType::Access);
    let refresh_claims = Claims::new(user_id, TokenType::Refresh);

    Ok(TokenPair {
        access_token: create_token(&access_claims, secret)?,
        refresh_token: create_token(&refresh_claims, secret)?,
    })
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, expiration, nbf, and issuer. Expiration is
/// enforced for every token type; a signed-but-stale refresh token is
/// rejected the same way a stale access token is.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and checks that it is an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::WrongTokenType { expected: "access" });
    }

    Ok(claims)
}

/// Validates a token and checks that it is a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::WrongTokenType { expected: "refresh" });
    }

    Ok(claims)
}
