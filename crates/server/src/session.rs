//! Session cookie plumbing: one opaque UUID cookie per browser.

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

use survey_core::model::SessionId;

/// Cookie name for the visitor's session identifier.
pub const SESSION_COOKIE: &str = "survey_session";

/// Extracts the session id from the request's `Cookie` header, if present
/// and well formed.
#[must_use]
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            value.parse().ok()
        } else {
            None
        }
    })
}

/// Returns the session from the headers, or a freshly issued one.
///
/// The boolean is true when the id was just issued and the response must
/// carry a `Set-Cookie` header.
#[must_use]
pub fn resolve_session(headers: &HeaderMap) -> (SessionId, bool) {
    match session_from_headers(headers) {
        Some(id) => (id, false),
        None => (SessionId::random(), true),
    }
}

/// Builds the `Set-Cookie` value for a newly issued session.
///
/// HttpOnly keeps the id away from scripts; `Max-Age` matches the store's
/// record TTL so cookie and record expire together.
#[must_use]
pub fn set_cookie_value(id: SessionId, ttl_secs: i64) -> HeaderValue {
    let cookie = format!(
        "{SESSION_COOKIE}={id}; Path=/; Max-Age={ttl_secs}; HttpOnly; SameSite=Lax"
    );
    HeaderValue::from_str(&cookie).expect("cookie value is always valid ASCII")
}
