//! End-to-end tests of the ingress pipeline against a live server.
//!
//! Each test spins up its own server on an ephemeral port with a
//! test-specific configuration, so tests stay independent (the rate-limit
//! window store is per-process state).
//!
//! Run with: `cargo test --test pipeline_tests`
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::sleep;

use lms_api::{AppState, Config, build_router};

const ALLOWED_ORIGIN: &str = "http://localhost:3000";
const DISALLOWED_ORIGIN: &str = "https://evil.example";

/// A server bound to an ephemeral port, plus a client to talk to it.
struct TestServer {
    base_url: String,
    client: Client,
}

impl TestServer {
    /// Start the application with the given configuration.
    async fn start(config: Config) -> Self {
        let state = AppState::new(config);
        let app = build_router(state).expect("router should build");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind an ephemeral port");
        let addr = listener.local_addr().expect("listener has a local addr");

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("server should run");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("client should build"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Baseline test configuration: limiter off, metrics off.
fn test_config() -> Config {
    Config {
        rate_limit_max: 0,
        metrics_port: 0,
        ..Config::default()
    }
}

// =============================================================================
// Diagnostic and fallback routes
// =============================================================================

#[tokio::test]
async fn test_diagnostic_endpoint() {
    let server = TestServer::start(test_config()).await;

    let resp = server.client.get(server.url("/test")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "message": "API is working"}));
}

#[tokio::test]
async fn test_unknown_route_yields_not_found_envelope() {
    let server = TestServer::start(test_config()).await;

    let resp = server
        .client
        .get(server.url("/api/v1/does-not-exist"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Route /api/v1/does-not-exist not found"
        })
    );
}

#[tokio::test]
async fn test_unknown_route_any_method() {
    let server = TestServer::start(test_config()).await;

    let resp = server
        .client
        .delete(server.url("/nowhere"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route /nowhere not found");
}

// =============================================================================
// Route groups: success and failure envelopes
// =============================================================================

#[tokio::test]
async fn test_route_group_success_envelope() {
    let server = TestServer::start(test_config()).await;

    let resp = server
        .client
        .post(server.url("/api/v1/users/register"))
        .json(&json!({"name": "Ada", "email": "ada@example.com"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Activation email sent to ada@example.com");
    // Data is flattened into the envelope
    assert_eq!(body["name"], "Ada");
}

#[tokio::test]
async fn test_handler_failure_is_translated() {
    let server = TestServer::start(test_config()).await;

    let resp = server
        .client
        .post(server.url("/api/v1/users/register"))
        .json(&json!({"name": "Ada", "email": "not-an-email"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"success": false, "message": "A valid email is required"})
    );
}

#[tokio::test]
async fn test_dispatch_is_exclusive_between_groups() {
    let server = TestServer::start(test_config()).await;

    // The course group owns /courses; its handlers answer, nothing else
    let resp = server
        .client
        .get(server.url("/api/v1/courses/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Rust for Web Services");

    // A sub-path no group claims falls through to the interceptor
    let resp = server
        .client
        .get(server.url("/api/v1/courses/1/lessons"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

// =============================================================================
// Body decoding
// =============================================================================

#[tokio::test]
async fn test_payload_under_ceiling_is_decoded() {
    let server = TestServer::start(Config {
        max_body_bytes: 1024,
        ..test_config()
    })
    .await;

    let resp = server
        .client
        .post(server.url("/api/v1/orders"))
        .json(&json!({"course_id": "course-1"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["course_id"], "course-1");
}

#[tokio::test]
async fn test_payload_over_ceiling_is_rejected() {
    let server = TestServer::start(Config {
        max_body_bytes: 256,
        ..test_config()
    })
    .await;

    let oversized = "x".repeat(1024);
    let resp = server
        .client
        .post(server.url("/api/v1/users/register"))
        .json(&json!({"name": oversized, "email": "ada@example.com"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 413);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"success": false, "message": "Request entity too large"})
    );
}

#[tokio::test]
async fn test_malformed_json_yields_error_envelope() {
    let server = TestServer::start(test_config()).await;

    let resp = server
        .client
        .post(server.url("/api/v1/users/register"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Malformed JSON in request body");
}

#[tokio::test]
async fn test_missing_field_message_is_sanitized() {
    let server = TestServer::start(test_config()).await;

    let resp = server
        .client
        .post(server.url("/api/v1/orders"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Missing required field: course_id");
}

// =============================================================================
// Cookie decoding
// =============================================================================

#[tokio::test]
async fn test_cookie_header_is_decoded_for_handlers() {
    let server = TestServer::start(test_config()).await;

    let resp = server
        .client
        .get(server.url("/api/v1/users/me"))
        .header("Cookie", "access_token=token-1; theme=dark")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_missing_cookie_header_is_not_a_failure() {
    let server = TestServer::start(test_config()).await;

    // The pipeline decodes an empty map; the handler itself raises 401
    let resp = server
        .client
        .get(server.url("/api/v1/users/me"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"success": false, "message": "Please login to access this resource"})
    );
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_after_allowance() {
    let server = TestServer::start(Config {
        rate_limit_max: 3,
        rate_limit_window: Duration::from_secs(60),
        metrics_port: 0,
        ..Config::default()
    })
    .await;

    for _ in 0..3 {
        let resp = server.client.get(server.url("/test")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
    }

    // Allowance spent: rejected regardless of target path
    let resp = server
        .client
        .get(server.url("/api/v1/courses"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 429);
    assert!(resp.headers().get("Retry-After").is_some());
    assert_eq!(
        resp.headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok()),
        Some("0")
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Too many requests, please try again later."
        })
    );
}

#[tokio::test]
async fn test_rate_limit_window_resets() {
    let server = TestServer::start(Config {
        rate_limit_max: 2,
        rate_limit_window: Duration::from_millis(500),
        metrics_port: 0,
        ..Config::default()
    })
    .await;

    for _ in 0..2 {
        let resp = server.client.get(server.url("/test")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
    }
    let resp = server.client.get(server.url("/test")).send().await.unwrap();
    assert_eq!(resp.status(), 429);

    // A fresh window restores the allowance
    sleep(Duration::from_millis(600)).await;
    let resp = server.client.get(server.url("/test")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_rate_limit_keys_on_forwarded_client() {
    let server = TestServer::start(Config {
        rate_limit_max: 1,
        rate_limit_window: Duration::from_secs(60),
        metrics_port: 0,
        ..Config::default()
    })
    .await;

    let resp = server
        .client
        .get(server.url("/test"))
        .header("X-Forwarded-For", "203.0.113.50")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = server
        .client
        .get(server.url("/test"))
        .header("X-Forwarded-For", "203.0.113.50")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 429);

    // A different client still has its own allowance
    let resp = server
        .client
        .get(server.url("/test"))
        .header("X-Forwarded-For", "198.51.100.7")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

// =============================================================================
// Access control
// =============================================================================

#[tokio::test]
async fn test_allowed_origin_receives_cors_headers() {
    let server = TestServer::start(test_config()).await;

    let resp = server
        .client
        .get(server.url("/test"))
        .header("Origin", ALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );
    assert_eq!(
        resp.headers()
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn test_disallowed_origin_gets_no_permissive_headers() {
    let server = TestServer::start(test_config()).await;

    let resp = server
        .client
        .get(server.url("/test"))
        .header("Origin", DISALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();

    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_error_responses_carry_cors_headers() {
    let server = TestServer::start(test_config()).await;

    // Allowed origin: even a 404 carries the permissive headers
    let resp = server
        .client
        .get(server.url("/api/v1/does-not-exist"))
        .header("Origin", ALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );

    // Disallowed origin: the 404 still has no permissive headers
    let resp = server
        .client
        .get(server.url("/api/v1/does-not-exist"))
        .header("Origin", DISALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_rate_limit_rejection_carries_cors_headers() {
    let server = TestServer::start(Config {
        rate_limit_max: 1,
        rate_limit_window: Duration::from_secs(60),
        metrics_port: 0,
        ..Config::default()
    })
    .await;

    let first = server
        .client
        .get(server.url("/test"))
        .header("Origin", ALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);

    let second = server
        .client
        .get(server.url("/test"))
        .header("Origin", ALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 429);
    assert_eq!(
        second
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );
}

// =============================================================================
// Observability
// =============================================================================

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = TestServer::start(test_config()).await;

    let resp = server.client.get(server.url("/test")).send().await.unwrap();
    assert!(resp.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_client_request_id_is_propagated() {
    let server = TestServer::start(test_config()).await;

    let resp = server
        .client
        .get(server.url("/test"))
        .header("X-Request-Id", "my-correlation-id")
        .send()
        .await
        .unwrap();

    assert_eq!(
        resp.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("my-correlation-id")
    );
}
