use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

use kernel::prelude::entity::{CartOwner, SessionId, UserId};

/// Set by the fronting auth layer for authenticated requests. Identity
/// itself is outside this service; only the opaque id crosses in.
pub static USER_ID_HEADER: &str = "x-user-id";

/// Carries the anonymous cart scope; minted on first contact.
pub static SESSION_COOKIE: &str = "cart_session";

pub fn authenticated_user(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()
        .and_then(|value| Uuid::parse_str(value).ok())
        .map(UserId::new)
}

pub fn session_id(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .map(SessionId::new)
}

/// Resolves the cart owner for this request. An anonymous visitor without a
/// usable session cookie gets a fresh session id plus the cookie to set.
pub fn resolve(headers: &HeaderMap, jar: &CookieJar) -> (CartOwner, Option<Cookie<'static>>) {
    if let Some(user) = authenticated_user(headers) {
        return (CartOwner::User(user), None);
    }
    if let Some(session) = session_id(jar) {
        return (CartOwner::Session(session), None);
    }
    let minted = Uuid::new_v4();
    let mut cookie = Cookie::new(SESSION_COOKIE, minted.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    (CartOwner::Session(SessionId::new(minted)), Some(cookie))
}

pub fn with_session_cookie(mut response: Response, cookie: Option<Cookie<'static>>) -> Response {
    if let Some(cookie) = cookie {
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}
