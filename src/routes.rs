//! Router assembly: the ordered ingress pipeline and the route-group table.
//!
//! # Route Groups
//!
//! Every business route group mounts under [`API_PREFIX`] at its own
//! disjoint sub-path. Dispatch is exclusive: a path matching one group's
//! mount is never evaluated against another group. Overlapping mounts are a
//! wiring bug and fail router construction.
//!
//! # Pipeline Order
//!
//! Layers added later run earlier on the way in, so the stack below is
//! listed innermost first. On the request side the effective order is:
//!
//! CORS → rate limiter → request id → trace → cookie decoding → dispatch
//!
//! The rate limiter sits ahead of dispatch so a rejected request does no
//! route work, and CORS is outermost so rate-limit rejections, not-found
//! failures, and translated errors all carry consistent access-control
//! headers.

use axum::extract::{DefaultBodyLimit, OriginalUri, Request};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Failure;
use crate::handlers;
use crate::middleware::{CookieDecodeLayer, MakeRequestUuid, RateLimitLayer};
use crate::models::Success;
use crate::state::AppState;

/// Shared prefix under which every route group is mounted.
pub const API_PREFIX: &str = "/api/v1";

/// Error raised when the route-group table is miswired.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("route group mounts overlap: {0} and {1}")]
    OverlappingMounts(String, String),
}

/// Build the application router with all route groups and middleware.
///
/// # Errors
///
/// Returns [`RouterError`] if two route groups claim overlapping mounts.
pub fn build_router(state: AppState) -> Result<Router, RouterError> {
    let config = &state.config;

    let cors = build_cors_layer(&config.allowed_origins, config.cors_allow_credentials);

    // =========================================================================
    // Route-group table (first structural match wins)
    // =========================================================================
    let groups: Vec<(&'static str, Router<AppState>)> = vec![
        ("/users", handlers::users::router()),
        ("/courses", handlers::courses::router()),
        ("/orders", handlers::orders::router()),
        ("/notifications", handlers::notifications::router()),
        ("/analytics", handlers::analytics::router()),
        ("/layouts", handlers::layouts::router()),
    ];
    check_disjoint_mounts(&groups)?;

    let mut api = Router::new();
    for (mount, group) in groups {
        api = api.nest(mount, group);
    }

    let mut router = Router::new()
        // Diagnostic endpoint: no auth, no body decoding, no state
        .route("/test", get(ping))
        .nest(API_PREFIX, api)
        // Anything unmatched raises RouteNotFound toward the error translator
        .fallback(route_not_found);

    // =========================================================================
    // Apply Middleware Stack (order matters - applied bottom to top)
    // =========================================================================

    // 1. Request body size limit, enforced at extraction time
    info!(
        max_size_mb = config.max_body_bytes / (1024 * 1024),
        "Request body size limit configured"
    );
    router = router.layer(DefaultBodyLimit::max(config.max_body_bytes));

    // 2. Cookie decoding, so handlers see the parsed map
    router = router.layer(CookieDecodeLayer::new());

    // 3. Tracing
    router = router.layer(TraceLayer::new_for_http());

    // 4. Request ID (set runs before propagate on the way in)
    router = router.layer(PropagateRequestIdLayer::x_request_id());
    router = router.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    // 5. Rate limiting ahead of dispatch (if enabled)
    if config.rate_limiting_enabled() {
        info!(
            max = config.rate_limit_max,
            window_secs = config.rate_limit_window.as_secs(),
            "Rate limiting enabled"
        );
        router = router.layer(RateLimitLayer::new(
            state.rate_windows.clone(),
            config.rate_limit_max,
            config.rate_limit_window,
        ));
    } else {
        info!("Rate limiting disabled (RATE_LIMIT_MAX=0)");
    }

    // 6. Request counting, outside the limiter so rejections are counted too
    router = router.layer(axum::middleware::from_fn(record_request_metrics));

    // 7. CORS, outermost
    router = router.layer(cors);

    Ok(router.with_state(state))
}

/// `GET /test` - unconditional liveness probe.
async fn ping() -> (StatusCode, Json<Success>) {
    (StatusCode::OK, Json(Success::message("API is working")))
}

/// Catch-all for requests no route group claimed.
async fn route_not_found(OriginalUri(uri): OriginalUri) -> Failure {
    Failure::route_not_found(uri.path())
}

/// Record one `ingress_requests_total` sample per handled request.
async fn record_request_metrics(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let response = next.run(req).await;
    crate::metrics::record_request(method.as_str(), response.status().as_u16());
    response
}

/// Build the CORS layer from the configured origin allow-list.
///
/// Origins are matched exactly. With credentials enabled the wildcard origin
/// is off the table, so methods and headers are explicit lists rather than
/// mirrors.
fn build_cors_layer(allowed_origins: &[String], allow_credentials: bool) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(allow_credentials)
}

/// Reject route-group tables where one mount shadows another.
fn check_disjoint_mounts(groups: &[(&'static str, Router<AppState>)]) -> Result<(), RouterError> {
    for (i, (a, _)) in groups.iter().enumerate() {
        for (b, _) in groups.iter().skip(i + 1) {
            if mounts_overlap(a, b) {
                return Err(RouterError::OverlappingMounts(a.to_string(), b.to_string()));
            }
        }
    }
    Ok(())
}

/// Two mounts overlap when equal, or when one is a segment-boundary prefix
/// of the other (`/users` vs `/users/admin`).
fn mounts_overlap(a: &str, b: &str) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    long == short || (long.starts_with(short) && long.as_bytes().get(short.len()) == Some(&b'/'))
}
