//! `X-Request-Id` generation for request correlation.
//!
//! Wired through tower-http's request-id layers in the router: ids arriving
//! on the request are kept, missing ones are minted here, and the final id
//! is propagated onto the response.

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Mints a UUIDv4 request id for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}
