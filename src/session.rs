use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum_extra::extract::CookieJar;

pub const SESSION_COOKIE_NAME: &str = "session";

pub fn get_session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Token from `Authorization: Bearer <token>`, if the header is well formed.
pub fn get_bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// The bearer header wins over the cookie when both are present.
pub fn request_token(headers: &HeaderMap) -> Option<String> {
    get_bearer_token(headers).or_else(|| get_session_token(&CookieJar::from_headers(headers)))
}
