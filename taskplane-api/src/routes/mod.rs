/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (login, register, refresh-token, logout)
/// - `users`: Profile retrieval and update

pub mod auth;
pub mod health;
pub mod users;
