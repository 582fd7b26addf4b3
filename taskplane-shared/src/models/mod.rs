/// Database models for Taskplane
///
/// This module contains the persistence gateway: models and their queries.
///
/// # Models
///
/// - `user`: User accounts and credential storage
/// - `task`: User-owned tasks, counted for profile statistics
///
/// # Example
///
/// ```no_run
/// use taskplane_shared::models::user::{User, CreateUser};
/// use taskplane_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     name: String::new(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
