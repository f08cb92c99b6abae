//! # LMS API
//!
//! HTTP ingress pipeline and API surface for an e-learning platform,
//! featuring:
//!
//! - **Uniform envelopes**: every response is `{success, message, ...}`,
//!   success or failure
//! - **Centralized error translation**: one terminal stage turns every
//!   raised failure into an error envelope
//! - **Fixed-window rate limiting**: per-client allowance enforced ahead of
//!   route dispatch, behind a swappable store
//! - **Observability**: request IDs, structured logging, Prometheus counters
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (CORS → Rate Limit → Request ID → Trace →       │
//! │              Cookie Decode)                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Route groups under /api/v1 (users, courses, orders,        │
//! │  notifications, analytics, layouts) + /test + fallback      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Error translation (Failure → {"success":false,...})        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lms_api::{AppState, Config, build_router};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let state = AppState::new(config);
//!     let app = build_router(state).unwrap();
//!
//!     // Serve the router...
//!     # let _ = app;
//! }
//! ```
//!
//! ## Ingress Policy Configuration
//!
//! ```bash
//! CORS_ALLOWED_ORIGINS=https://app.example.com RATE_LIMIT_MAX=100 cargo run
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use error::{Failure, FailureKind, HandlerResult};
pub use extract::JsonBody;
pub use routes::build_router;
pub use state::AppState;
