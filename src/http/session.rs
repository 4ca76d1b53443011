//! Session identification for browser (cookie) and API (header) callers.

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use std::convert::Infallible;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "lottery_session";
pub const SESSION_HEADER: &str = "x-lottery-session";

/// The session ID the caller presented, if any and well-formed.
#[derive(Debug, Clone, Copy)]
pub struct SessionHint(pub Option<Uuid>);

impl<S: Send + Sync> FromRequestParts<S> for SessionHint {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_from_headers(&parts.headers)))
    }
}

/// Header wins over cookie.
pub fn session_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let from_header = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok());
    if from_header.is_some() {
        return from_header;
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Echo the session ID back as both cookie and header, if there is one.
pub fn attach_session(id: Option<Uuid>, mut response: Response) -> Response {
    let Some(id) = id else {
        return response;
    };
    let headers = response.headers_mut();
    let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Strict", SESSION_COOKIE, id);
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.append(SET_COOKIE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        headers.insert(SESSION_HEADER, value);
    }
    response
}
