/// Password hashing using Argon2id
///
/// Credential storage and verification for the login and register flows.
/// Hashes are PHC strings, so the algorithm parameters and salt travel with
/// the hash and verification never needs external configuration.
///
/// # Example
///
/// ```
/// use taskplane_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password with Argon2id and a fresh random salt
///
/// Returns a PHC string, e.g.
/// `$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$...`.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC-string hash
///
/// Wrong passwords are `Ok(false)`; only malformed hashes or internal
/// failures are errors. Comparison is constant-time.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}
