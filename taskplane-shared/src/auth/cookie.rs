/// Refresh-token cookie construction
///
/// The refresh token never appears in a response body; it travels in a
/// `refreshToken` cookie that browsers attach to the refresh endpoint.
/// Attributes: httpOnly (no script access), secure, SameSite=None (the web
/// client is served from a different origin), scoped to the configured
/// domain, Max-Age equal to the refresh token's signed 7-day lifetime.
///
/// Clearing replaces the value with an empty string and an epoch expiry.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

/// Cookie name for the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Cookie lifetime, kept in lockstep with [`TokenType::Refresh`]'s lifetime
///
/// [`TokenType::Refresh`]: super::jwt::TokenType::Refresh
const REFRESH_COOKIE_MAX_AGE: Duration = Duration::days(7);

/// Builds the refresh-token cookie attached on login, register, and refresh
pub fn refresh_token_cookie(token: &str, domain: &str) -> Cookie<'static> {
    Cookie::build((REFRESH_TOKEN_COOKIE, token.to_string()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .domain(domain.to_string())
        .path("/")
        .max_age(REFRESH_COOKIE_MAX_AGE)
        .build()
}

/// Builds an expired cookie that clears the refresh token on the client
pub fn clear_refresh_token_cookie(domain: &str) -> Cookie<'static> {
    Cookie::build((REFRESH_TOKEN_COOKIE, String::new()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .domain(domain.to_string())
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;

    #[test]
    fn test_refresh_cookie_attributes() {
        let cookie = refresh_token_cookie("some-token", "localhost");

        assert_eq!(cookie.name(), "refreshToken");
        assert_eq!(cookie.value(), "some-token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.domain(), Some("localhost"));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn test_cookie_lifetime_matches_token_lifetime() {
        // The cookie must not outlive or undercut the signed refresh token.
        assert_eq!(
            REFRESH_COOKIE_MAX_AGE.whole_days(),
            TokenType::Refresh.lifetime().num_days()
        );
    }

    #[test]
    fn test_clear_cookie_is_empty_and_epoch_expired() {
        let cookie = clear_refresh_token_cookie("localhost");

        assert_eq!(cookie.name(), "refreshToken");
        assert_eq!(cookie.value(), "");
        assert_eq!(
            cookie.expires().and_then(|e| e.datetime()),
            Some(OffsetDateTime::UNIX_EPOCH)
        );
    }
}
