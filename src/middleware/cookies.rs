//! Cookie decoding middleware.
//!
//! Parses the `Cookie` header into a name→value map and attaches it to the
//! request before dispatch, so every route-group handler can take the
//! [`Cookies`] extractor without touching raw headers. A missing or
//! malformed header yields an empty map, never a failure.

use std::collections::HashMap;
use std::convert::Infallible;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderValue, Request, Response, header};
use tower::{Layer, Service};

/// Decoded request cookies, attached by [`CookieDecodeLayer`].
#[derive(Debug, Clone, Default)]
pub struct Cookies(HashMap<String, String>);

impl Cookies {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Cookies {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<S> FromRequestParts<S> for Cookies
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Absent layer or header both read as "no cookies".
        Ok(parts.extensions.get::<Cookies>().cloned().unwrap_or_default())
    }
}

/// Layer attaching decoded cookies to every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieDecodeLayer;

impl CookieDecodeLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for CookieDecodeLayer {
    type Service = CookieDecodeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CookieDecodeService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct CookieDecodeService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for CookieDecodeService<S>
where
    S: Service<Request<Body>, Response = Response<Body>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let cookies = decode_cookie_header(req.headers().get(header::COOKIE));
        req.extensions_mut().insert(cookies);
        self.inner.call(req)
    }
}

/// Parse a `Cookie` header into a map. Segments without `=` are skipped;
/// for duplicate names the first occurrence wins.
pub fn decode_cookie_header(value: Option<&HeaderValue>) -> Cookies {
    let mut map = HashMap::new();

    if let Some(raw) = value
        && let Ok(raw) = raw.to_str()
    {
        for segment in raw.split(';') {
            if let Some((name, value)) = segment.split_once('=') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                map.entry(name.to_string())
                    .or_insert_with(|| value.trim().to_string());
            }
        }
    }

    Cookies(map)
}
