//! HTTP middleware for the ingress pipeline.
//!
//! # Pipeline (request order)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │      CORS        │ ← headers on every response, allowed or not
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  Rate Limiting   │ ← 429 fixed body if the window allowance is spent
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │   Request ID     │ ← X-Request-Id set and propagated
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Cookie Decoding  │ ← name→value map attached to the request
//! └────────┬─────────┘
//!          │
//!          ▼
//!   Route dispatch (body decoding inside, then handler or fallback)
//! ```
//!
//! The rate limiter runs ahead of dispatch so rejected requests never reach
//! route matching. CORS is outermost so even rate-limit rejections and
//! translated failures carry consistent access-control headers.

pub mod client_key;
pub mod cookies;
pub mod rate_limit;
pub mod request_id;

pub use client_key::{UNKNOWN_CLIENT, client_key};
pub use cookies::{CookieDecodeLayer, Cookies, decode_cookie_header};
pub use rate_limit::{
    InMemoryWindowStore, RATE_LIMIT_MESSAGE, RateLimitLayer, WindowSnapshot, WindowStore,
};
pub use request_id::MakeRequestUuid;
