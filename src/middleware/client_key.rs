//! Client identity used to key the rate limiter.
//!
//! Requests behind a reverse proxy carry the original client address in
//! `X-Forwarded-For` (first entry) or `X-Real-IP`; direct connections fall
//! back to the peer socket address recorded by `ConnectInfo`. Requests with
//! none of these share the [`UNKNOWN_CLIENT`] key and are rate-limited
//! collectively.
//!
//! These headers are client-controlled. Deploy behind a proxy that
//! overwrites them, or direct clients can rotate spoofed keys.

use std::borrow::Cow;
use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::Request;

/// Shared key for requests whose client cannot be identified.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Extract the rate-limit key for a request.
///
/// Priority: `X-Forwarded-For` (first entry), `X-Real-IP`, peer socket
/// address, then [`UNKNOWN_CLIENT`]. Returns `Cow` so the fallback costs no
/// allocation.
pub fn client_key<B>(req: &Request<B>) -> Cow<'static, str> {
    if let Some(forwarded) = req.headers().get("x-forwarded-for")
        && let Ok(value) = forwarded.to_str()
        && let Some(first) = value.split(',').next()
    {
        let first = first.trim();
        if !first.is_empty() {
            return Cow::Owned(first.to_string());
        }
    }

    if let Some(real_ip) = req.headers().get("x-real-ip")
        && let Ok(value) = real_ip.to_str()
        && !value.trim().is_empty()
    {
        return Cow::Owned(value.trim().to_string());
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return Cow::Owned(addr.ip().to_string());
    }

    Cow::Borrowed(UNKNOWN_CLIENT)
}
