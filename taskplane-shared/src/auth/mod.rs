/// Authentication utilities
///
/// This module provides the authentication primitives for Taskplane:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access/refresh token issuance and validation
/// - [`cookie`]: Refresh-token cookie construction and clearing
/// - [`middleware`]: Bearer-token auth context for protected routes
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with per-password random salts
/// - **Tokens**: HS256-signed JWTs, 1 hour (access) / 7 days (refresh)
/// - **Cookies**: httpOnly, secure, SameSite=None, scoped to a domain
///
/// # Example
///
/// ```no_run
/// use taskplane_shared::auth::password::{hash_password, verify_password};
/// use taskplane_shared::auth::jwt::issue_token_pair;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let pair = issue_token_pair(Uuid::new_v4(), "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod cookie;
pub mod jwt;
pub mod middleware;
pub mod password;
