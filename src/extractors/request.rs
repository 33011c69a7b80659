//! Request facts the backend actions negotiate on.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// True when the request was sent asynchronously (`X-Requested-With: XMLHttpRequest`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsyncRequest(pub bool);

#[async_trait]
impl<S> FromRequestParts<S> for AsyncRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_async = parts
            .headers
            .get(REQUESTED_WITH_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case(XML_HTTP_REQUEST));
        Ok(AsyncRequest(is_async))
    }
}

/// Where to send the browser back to: the `Referer` header, or `/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Referer(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Referer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let target = parts
            .headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("/");
        Ok(Referer(target.to_string()))
    }
}
