/// Task model and counting queries
///
/// Tasks are owned by users; this service only creates rows (for fixtures
/// and future endpoints) and counts them for profile statistics. Task
/// lifecycle management is a separate surface and not handled here.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task model representing a user-owned task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Completion flag
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user
    pub user_id: Uuid,

    /// Initial completion flag
    pub completed: bool,
}

/// Filter for counting a user's tasks
///
/// The default filter counts everything. Narrow it with [`completed`] and
/// [`created_since`]; conditions compose with AND.
///
/// [`completed`]: TaskCountFilter::completed
/// [`created_since`]: TaskCountFilter::created_since
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskCountFilter {
    /// Count only tasks with this completion state
    pub completed: Option<bool>,

    /// Count only tasks created at or after this instant
    pub created_since: Option<DateTime<Utc>>,
}

impl TaskCountFilter {
    /// Restricts the count to tasks with the given completion state
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Restricts the count to tasks created at or after `since`
    pub fn created_since(mut self, since: DateTime<Utc>) -> Self {
        self.created_since = Some(since);
        self
    }
}

impl Task {
    /// Creates a new task for a user
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, completed)
            VALUES ($1, $2)
            RETURNING id, user_id, completed, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.completed)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Counts a user's tasks matching a filter
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskplane_shared::models::task::{Task, TaskCountFilter};
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    /// let total = Task::count_for_user(&pool, user_id, TaskCountFilter::default()).await?;
    /// let done =
    ///     Task::count_for_user(&pool, user_id, TaskCountFilter::default().completed(true)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: Uuid,
        filter: TaskCountFilter,
    ) -> Result<i64, sqlx::Error> {
        // Build the WHERE clause dynamically from the filter
        let mut query = String::from("SELECT COUNT(*) FROM tasks WHERE user_id = $1");
        let mut bind_count = 1;

        if filter.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND completed = ${}", bind_count));
        }
        if filter.created_since.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND created_at >= ${}", bind_count));
        }

        let mut q = sqlx::query_as::<_, (i64,)>(&query).bind(user_id);

        if let Some(completed) = filter.completed {
            q = q.bind(completed);
        }
        if let Some(since) = filter.created_since {
            q = q.bind(since);
        }

        let (count,) = q.fetch_one(pool).await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_default_is_unrestricted() {
        let filter = TaskCountFilter::default();
        assert!(filter.completed.is_none());
        assert!(filter.created_since.is_none());
    }

    #[test]
    fn test_filter_builders_compose() {
        let since = Utc::now();
        let filter = TaskCountFilter::default().completed(true).created_since(since);

        assert_eq!(filter.completed, Some(true));
        assert_eq!(filter.created_since, Some(since));
    }
}
