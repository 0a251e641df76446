//! Set-Cookie builders and Cookie-header parsing for the token transport.
//!
//! Both auth cookies are `HttpOnly; Secure; SameSite=Lax; Path=/` with no
//! Max-Age: session-scoped on the client, with the token's own expiry
//! governing reuse. Clearing uses the same attributes plus `Max-Age=0` so
//! browsers match the original cookie.

use axum::http::HeaderMap;

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Build a `Set-Cookie` header value for an auth token.
pub fn build_set_cookie(name: &str, value: &str) -> String {
    format!("{name}={value}; HttpOnly; Secure; SameSite=Lax; Path=/")
}

/// Build a `Set-Cookie` header value that clears an auth cookie.
pub fn build_clear_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0")
}

/// Extract a cookie value from the request's `Cookie` header(s).
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k.trim() == name).then(|| v.trim().to_string())
        })
        .next()
}
