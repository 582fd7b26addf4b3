/// Profile endpoints
///
/// Both routes operate on the authenticated user (from the bearer token);
/// there is no path parameter for selecting other users.
///
/// # Endpoints
///
/// - `GET /users/current-user/profile` - User plus task statistics
/// - `PUT /users/current-user` - Partial update of name/email/password

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use taskplane_shared::{
    auth::{middleware::AuthContext, password},
    models::{
        task::{Task, TaskCountFilter},
        user::{UpdateUser, User},
    },
};
use uuid::Uuid;
use validator::Validate;

/// User as exposed over HTTP: the stored record minus the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Display name (empty until set)
    pub name: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// One labeled statistic in the profile response
#[derive(Debug, Serialize, Deserialize)]
pub struct Statistic {
    /// Display label
    pub label: String,

    /// Task count
    pub value: i64,
}

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Authenticated user, without the password hash
    pub user: PublicUser,

    /// Ordered statistics: total, completed, created today, created this week
    pub statistics: Vec<Statistic>,
}

/// Partial profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New display name
    pub name: Option<String>,

    /// New plaintext password, re-hashed before storage
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

/// Profile update response
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfileResponse {
    /// Display name after the update
    pub name: String,

    /// Email address after the update
    pub email: String,
}

/// Profile handler
///
/// # Endpoint
///
/// ```text
/// GET /users/current-user/profile
/// Authorization: Bearer <access token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "user": { "id": "...", "email": "...", "name": "", ... },
///   "statistics": [
///     { "label": "Total", "value": 3 },
///     { "label": "Completed tasks", "value": 1 },
///     { "label": "Today tasks", "value": 2 },
///     { "label": "Week tasks", "value": 3 }
///   ]
/// }
/// ```
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let now = Utc::now();
    // "Today" starts at UTC midnight; "week" is a rolling 7-day window, so
    // today's tasks are always a subset of the week's
    let start_of_today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let week_ago = now - Duration::days(7);

    let total = Task::count_for_user(&state.db, user.id, TaskCountFilter::default()).await?;
    let completed =
        Task::count_for_user(&state.db, user.id, TaskCountFilter::default().completed(true))
            .await?;
    let today = Task::count_for_user(
        &state.db,
        user.id,
        TaskCountFilter::default().created_since(start_of_today),
    )
    .await?;
    let week = Task::count_for_user(
        &state.db,
        user.id,
        TaskCountFilter::default().created_since(week_ago),
    )
    .await?;

    let statistics = vec![
        Statistic {
            label: "Total".to_string(),
            value: total,
        },
        Statistic {
            label: "Completed tasks".to_string(),
            value: completed,
        },
        Statistic {
            label: "Today tasks".to_string(),
            value: today,
        },
        Statistic {
            label: "Week tasks".to_string(),
            value: week,
        },
    ];

    Ok(Json(ProfileResponse {
        user: user.into(),
        statistics,
    }))
}

/// Profile update handler
///
/// Only the provided fields are written. A new password is re-hashed; an
/// absent password leaves the stored hash untouched.
///
/// # Endpoint
///
/// ```text
/// PUT /users/current-user
/// Authorization: Bearer <access token>
/// Content-Type: application/json
///
/// { "name": "Jane", "password": "new-secret" }
/// ```
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UpdateProfileResponse>> {
    req.validate()?;

    let password_hash = match req.password.as_deref() {
        Some(new_password) => Some(password::hash_password(new_password)?),
        None => None,
    };

    let user = User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            email: req.email,
            name: req.name,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(Json(UpdateProfileResponse {
        name: user.name,
        email: user.email,
    }))
}
