//! Fixed-window rate limiting, applied ahead of route dispatch.
//!
//! # Algorithm
//!
//! Each client key owns a counter and a window-start timestamp. A request
//! whose window has elapsed resets both; otherwise the counter increments.
//! Once the counter passes the configured ceiling the request is rejected
//! with the fixed body
//! `{"success":false,"message":"Too many requests, please try again later."}`
//! and status 429, without doing any route work.
//!
//! Rejections are written here directly rather than raised as a `Failure`:
//! the response body is fixed, not derived from a status/message pair.
//!
//! # State
//!
//! Window state lives behind the [`WindowStore`] trait, so the in-memory
//! [`InMemoryWindowStore`] can be swapped for a shared store in horizontally
//! scaled deployments without touching pipeline logic. The in-memory store
//! is per-process and never persisted.
//!
//! # Response Headers
//!
//! On rejection:
//! - `Retry-After`: seconds until the client's window resets
//! - `X-RateLimit-Limit`: configured ceiling
//! - `X-RateLimit-Remaining`: always `0`

use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::Json;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::response::IntoResponse;
use dashmap::DashMap;
use tower::{Layer, Service};
use tracing::warn;

use super::client_key::client_key;
use crate::models::ErrorBody;

/// Body sent with every rate-limit rejection.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

/// Counter state returned by a store after recording a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Requests recorded in the current window, including this one.
    pub count: u32,
    /// When the current window opened.
    pub window_start: Instant,
}

/// Per-client request counting over a fixed window.
///
/// The limiter only ever talks to this trait. `now` is passed in rather than
/// read inside, which keeps window arithmetic testable without sleeping.
pub trait WindowStore: Send + Sync + 'static {
    /// Record one request from `key` at `now`, resetting the window first if
    /// it has elapsed.
    fn increment(&self, key: &str, now: Instant, window: Duration) -> WindowSnapshot;
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    window_start: Instant,
}

/// In-memory, per-process window store.
///
/// Entries are created lazily on a client's first request and dropped by
/// [`prune`](Self::prune) once their window has elapsed.
#[derive(Debug, Default)]
pub struct InMemoryWindowStore {
    entries: DashMap<String, WindowEntry>,
}

impl InMemoryWindowStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Drop entries whose window has fully elapsed at `now`. Returns how many
    /// were removed. Without this, the map grows with every client ever seen.
    pub fn prune(&self, now: Instant, window: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.window_start) < window);
        before.saturating_sub(self.entries.len())
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }
}

impl WindowStore for InMemoryWindowStore {
    fn increment(&self, key: &str, now: Instant, window: Duration) -> WindowSnapshot {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert(WindowEntry {
                count: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start) >= window {
            entry.count = 0;
            entry.window_start = now;
        }
        entry.count = entry.count.saturating_add(1);

        WindowSnapshot {
            count: entry.count,
            window_start: entry.window_start,
        }
    }
}

/// Rate limiting layer for the Tower middleware stack.
///
/// ```rust,ignore
/// let layer = RateLimitLayer::new(store, 100, Duration::from_secs(15 * 60));
/// let app = Router::new().route("/api", get(handler)).layer(layer);
/// ```
#[derive(Clone)]
pub struct RateLimitLayer {
    store: Arc<dyn WindowStore>,
    max_requests: u32,
    window: Duration,
}

impl RateLimitLayer {
    /// Limit each client key to `max_requests` per `window`.
    pub fn new(store: Arc<dyn WindowStore>, max_requests: u32, window: Duration) -> Self {
        Self {
            store,
            max_requests,
            window,
        }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            store: self.store.clone(),
            max_requests: self.max_requests,
            window: self.window,
        }
    }
}

/// Rate limiting service wrapper.
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    store: Arc<dyn WindowStore>,
    max_requests: u32,
    window: Duration,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let key = client_key(&req).into_owned();
        let now = Instant::now();
        let snapshot = self.store.increment(&key, now, self.window);

        if snapshot.count > self.max_requests {
            // count > max implies the window has not elapsed yet
            let retry_after = self
                .window
                .saturating_sub(now.duration_since(snapshot.window_start))
                .as_secs()
                .max(1);

            warn!(
                client = %key,
                count = snapshot.count,
                path = %req.uri().path(),
                retry_after_secs = retry_after,
                "rate limit exceeded"
            );
            crate::metrics::record_rate_limited();

            let response = (
                StatusCode::TOO_MANY_REQUESTS,
                [
                    ("Retry-After", retry_after.to_string()),
                    ("X-RateLimit-Limit", self.max_requests.to_string()),
                    ("X-RateLimit-Remaining", "0".to_string()),
                ],
                Json(ErrorBody::new(RATE_LIMIT_MESSAGE)),
            )
                .into_response();

            return Box::pin(async move { Ok(response) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}
