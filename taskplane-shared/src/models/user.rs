/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL DEFAULT '',
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskplane_shared::models::user::{User, CreateUser};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     name: String::new(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The hash
/// stays inside the service; response types strip it before serialization.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Display name; empty until the user sets one
    pub name: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Display name (registration passes an empty string)
    pub name: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,
}

/// Input for partially updating a user
///
/// Only non-None fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New email address
    pub email: Option<String>,

    /// New display name
    pub name: Option<String>,

    /// New password hash
    pub password_hash: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint) or
    /// the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID, `None` if absent
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address, `None` if absent
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Partially updates a user
    ///
    /// Only fields present in `data` are written; `updated_at` is always
    /// bumped. Returns the updated row, or `None` if the user is gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the new email collides with another user or the
    /// database is unreachable.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the UPDATE dynamically from the fields that are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, email, name, password_hash, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }
}
