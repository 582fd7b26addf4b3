/// Integration tests for the session authentication and profile flows
///
/// These tests drive the full router end-to-end against a real database:
/// - Register/login semantics, including the deliberate 404-on-bad-password
/// - Refresh-cookie issuance, rotation, and clearing
/// - Expired-refresh-token rejection (pinned behavior)
/// - Profile statistics and partial profile updates

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::TestContext;
use serde_json::json;
use taskplane_shared::auth::jwt::{self, Claims, TokenType};
use taskplane_shared::models::task::{CreateTask, Task};
use uuid::Uuid;

#[tokio::test]
async fn test_register_sets_a_hardened_refresh_cookie() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .send(common::post_json(
            "/auth/register",
            &json!({ "email": common::unique_email("cookie"), "password": "secret123" }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let set_cookie = common::refresh_set_cookie(&response).expect("Refresh cookie should be set");
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=None"));
    // Cookie lifetime matches the 7-day refresh token lifetime
    assert!(set_cookie.contains("Max-Age=604800"));
}

#[tokio::test]
async fn test_register_duplicate_email_fails_with_bad_request() {
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("duplicate");

    common::register_user(&ctx, &email, "secret123").await;

    let response = ctx
        .send(common::post_json(
            "/auth/register",
            &json!({ "email": email, "password": "secret123" }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_login_returns_user_without_password_and_a_valid_access_token() {
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("login");

    common::register_user(&ctx, &email, "secret123").await;

    let response = ctx
        .send(common::post_json(
            "/auth/login",
            &json!({ "email": email, "password": "secret123" }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::refresh_set_cookie(&response).is_some());

    let body = common::body_json(response).await;
    assert_eq!(body["user"]["email"], email.as_str());

    // The stored hash must never appear, under any plausible key
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());

    // The access token must validate as an access token and carry the user id
    let access_token = body["accessToken"].as_str().expect("accessToken present");
    let claims = jwt::validate_access_token(access_token, &ctx.config.jwt.secret)
        .expect("Access token should validate");
    let user_id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(claims.sub, user_id);
}

#[tokio::test]
async fn test_login_with_wrong_password_fails_with_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("badpass");

    common::register_user(&ctx, &email, "secret123").await;

    let response = ctx
        .send(common::post_json(
            "/auth/login",
            &json!({ "email": email, "password": "wrong-password" }),
            None,
        ))
        .await;

    // Deliberately 404, not 401: the response must not reveal whether the
    // email or the password was wrong
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_with_unknown_email_fails_with_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .send(common::post_json(
            "/auth/login",
            &json!({ "email": common::unique_email("ghost"), "password": "secret123" }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_refresh_without_cookie_clears_cookie_and_fails() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .send(common::post_json("/auth/refresh-token", &json!({}), None))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The 401 must also clear whatever cookie the client held
    let set_cookie = common::refresh_set_cookie(&response).expect("Clearing cookie should be set");
    assert!(set_cookie.starts_with("refreshToken=;"));
    assert!(set_cookie.contains("01 Jan 1970"));
}

#[tokio::test]
async fn test_refresh_rotates_the_token_pair() {
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("rotate");

    let (body, refresh_token) = common::register_user(&ctx, &email, "secret123").await;
    let first_access = body["accessToken"].as_str().unwrap().to_string();

    // JWTs are second-granular; make sure the reissued pair gets a new iat
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let response = ctx
        .send(common::post_json(
            "/auth/refresh-token",
            &json!({}),
            Some(&refresh_token),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = common::refresh_set_cookie(&response).expect("New refresh cookie expected");
    let new_refresh = common::cookie_value(&set_cookie);
    assert_ne!(new_refresh, refresh_token, "Refresh token should rotate");

    let body = common::body_json(response).await;
    let new_access = body["accessToken"].as_str().unwrap();
    assert_ne!(new_access, first_access, "Access token should be reissued");
    assert_eq!(body["user"]["email"], email.as_str());

    jwt::validate_refresh_token(&new_refresh, &ctx.config.jwt.secret)
        .expect("Rotated refresh token should validate");
}

#[tokio::test]
async fn test_refresh_with_expired_token_is_unauthorized() {
    // Pins the expiration decision: a validly signed refresh token whose exp
    // has passed must be rejected, not exchanged.
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("expired");

    let (body, _) = common::register_user(&ctx, &email, "secret123").await;
    let user_id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();

    let claims = Claims::with_expiration(user_id, TokenType::Refresh, chrono::Duration::seconds(-60));
    let stale_token = jwt::create_token(&claims, &ctx.config.jwt.secret).unwrap();

    let response = ctx
        .send(common::post_json(
            "/auth/refresh-token",
            &json!({}),
            Some(&stale_token),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_an_access_token_in_the_cookie() {
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("confused");

    let (body, _) = common::register_user(&ctx, &email, "secret123").await;
    let access_token = body["accessToken"].as_str().unwrap();

    let response = ctx
        .send(common::post_json(
            "/auth/refresh-token",
            &json!({}),
            Some(access_token),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_requires_a_bearer_token() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/users/current-user/profile")
        .body(Body::empty())
        .unwrap();

    let response = ctx.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_statistics_count_tasks() {
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("stats");

    let (body, _) = common::register_user(&ctx, &email, "secret123").await;
    let access_token = body["accessToken"].as_str().unwrap().to_string();
    let user_id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();

    // Three tasks: one completed today, one open today, one open from last week
    Task::create(&ctx.db, CreateTask { user_id, completed: true })
        .await
        .unwrap();
    Task::create(&ctx.db, CreateTask { user_id, completed: false })
        .await
        .unwrap();
    let old_task = Task::create(&ctx.db, CreateTask { user_id, completed: false })
        .await
        .unwrap();
    sqlx::query("UPDATE tasks SET created_at = NOW() - INTERVAL '3 days' WHERE id = $1")
        .bind(old_task.id)
        .execute(&ctx.db)
        .await
        .unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/users/current-user/profile")
        .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(body["user"].get("passwordHash").is_none());

    let statistics = body["statistics"].as_array().expect("statistics array");
    assert_eq!(statistics.len(), 4);
    assert_eq!(statistics[0], json!({ "label": "Total", "value": 3 }));
    assert_eq!(statistics[1], json!({ "label": "Completed tasks", "value": 1 }));
    assert_eq!(statistics[2], json!({ "label": "Today tasks", "value": 2 }));
    assert_eq!(statistics[3], json!({ "label": "Week tasks", "value": 3 }));
}

#[tokio::test]
async fn test_update_profile_rehashes_the_password() {
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("rehash");

    let (body, _) = common::register_user(&ctx, &email, "old-secret").await;
    let access_token = body["accessToken"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("PUT")
        .uri("/users/current-user")
        .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "name": "Jane", "password": "new-secret" }).to_string(),
        ))
        .unwrap();

    let response = ctx.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body, json!({ "name": "Jane", "email": email.as_str() }));

    // Old password no longer verifies, the new one does
    let response = ctx
        .send(common::post_json(
            "/auth/login",
            &json!({ "email": email, "password": "old-secret" }),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .send(common::post_json(
            "/auth/login",
            &json!({ "email": email, "password": "new-secret" }),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_profile_without_password_keeps_the_hash() {
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("keep-hash");

    let (body, _) = common::register_user(&ctx, &email, "secret123").await;
    let access_token = body["accessToken"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("PUT")
        .uri("/users/current-user")
        .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "Janet" }).to_string()))
        .unwrap();

    let response = ctx.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["name"], "Janet");

    // The original password still verifies
    let response = ctx
        .send(common::post_json(
            "/auth/login",
            &json!({ "email": email, "password": "secret123" }),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_session_flow_register_login_refresh_logout() {
    let ctx = TestContext::new().await.unwrap();
    let email = common::unique_email("e2e");

    // Register
    let (register_body, register_refresh) =
        common::register_user(&ctx, &email, "secret123").await;
    jwt::validate_access_token(
        register_body["accessToken"].as_str().unwrap(),
        &ctx.config.jwt.secret,
    )
    .expect("Register should issue a valid access token");

    // Login reissues an independent pair
    let response = ctx
        .send(common::post_json(
            "/auth/login",
            &json!({ "email": email, "password": "secret123" }),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let login_refresh =
        common::cookie_value(&common::refresh_set_cookie(&response).expect("Login sets cookie"));

    // Refresh rotates the pair from the login cookie
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let response = ctx
        .send(common::post_json(
            "/auth/refresh-token",
            &json!({}),
            Some(&login_refresh),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated_refresh =
        common::cookie_value(&common::refresh_set_cookie(&response).expect("Refresh sets cookie"));
    assert_ne!(rotated_refresh, register_refresh);
    assert_ne!(rotated_refresh, login_refresh);

    // Logout clears the cookie and acknowledges with `true`
    let response = ctx
        .send(common::post_json("/auth/logout", &json!({}), None))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let set_cookie = common::refresh_set_cookie(&response).expect("Logout clears cookie");
    assert!(set_cookie.starts_with("refreshToken=;"));
    assert!(set_cookie.contains("01 Jan 1970"));

    let body = common::body_json(response).await;
    assert_eq!(body, json!(true));
}
