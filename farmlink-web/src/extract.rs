//! Request extractors

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use farmlink_common::auth;
use farmlink_common::db::models::User;

use crate::{db, error::ApiError, AppState};

/// Session cookie name
pub const SESSION_COOKIE: &str = "farmlink_session";

/// Authenticated caller resolved from the session cookie.
///
/// Rejection redirects to /login: an anonymous request on a protected route
/// is a navigation problem, not a server error.
pub struct CurrentUser {
    pub user: User,
    pub session_token: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|header| find_cookie(header, SESSION_COOKIE))
            .ok_or(ApiError::LoginRequired)?;

        let token = auth::decode_session_cookie(raw, &state.config.secret_key)
            .ok_or(ApiError::LoginRequired)?;

        let user = db::sessions::find_user(&state.db, token)
            .await
            .map_err(ApiError::from)?
            .ok_or(ApiError::LoginRequired)?;

        Ok(CurrentUser {
            user,
            session_token: token.to_string(),
        })
    }
}

fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.split_once('=').and_then(|(k, v)| (k == name).then_some(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_header_parsing() {
        let header = "theme=dark; farmlink_session=abc.def; other=1";
        assert_eq!(find_cookie(header, SESSION_COOKIE), Some("abc.def"));
        assert_eq!(find_cookie(header, "theme"), Some("dark"));
        assert_eq!(find_cookie(header, "missing"), None);
        assert_eq!(find_cookie("", SESSION_COOKIE), None);
    }
}
