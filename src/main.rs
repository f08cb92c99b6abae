use std::net::SocketAddr;
use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lms_api::{AppState, Config, build_router, metrics, utils};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting LMS API v{}", env!("CARGO_PKG_VERSION"));

    match run().await {
        Ok(()) => ExitCode::from(exitcode::OK as u8),
        Err(exit_code) => ExitCode::from(exit_code as u8),
    }
}

/// Run the application, returning an exit code on error.
async fn run() -> Result<(), exitcode::ExitCode> {
    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {e}");
        exitcode::CONFIG
    })?;
    info!(
        host = %config.host,
        port = %config.port,
        origins = config.allowed_origins.len(),
        rate_limit_max = config.rate_limit_max,
        "Configuration loaded"
    );

    // Parse the bind address before the config moves into the state
    let addr: SocketAddr = config.server_addr().parse().map_err(|e| {
        error!("Invalid server address: {e}");
        exitcode::CONFIG
    })?;

    // Metrics exporter (optional)
    if let Some(metrics_addr) = config.metrics_addr() {
        metrics::try_init_metrics(metrics_addr);
    }

    // Build application state and router
    let state = AppState::new(config);
    let app = build_router(state.clone()).map_err(|e| {
        error!("Failed to build router: {e}");
        exitcode::CONFIG
    })?;

    // Start server
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind to {addr}: {e}");
        exitcode::UNAVAILABLE
    })?;

    info!("Server listening on http://{addr}");
    info!("API endpoints:");
    info!("  GET  /test                     - Diagnostic check");
    info!("  POST /api/v1/users/register    - Register a user");
    info!("  GET  /api/v1/users/me          - Current user profile");
    info!("  GET  /api/v1/courses           - List courses");
    info!("  POST /api/v1/orders            - Place an order");
    info!("  GET  /api/v1/notifications     - List notifications");
    info!("  GET  /api/v1/analytics/users   - User analytics");
    info!("  GET  /api/v1/layouts/{{kind}}    - Page layout");

    // Peer addresses feed the rate limiter when no proxy headers are present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(utils::shutdown_signal())
    .await
    .map_err(|e| {
        error!("Server error: {e}");
        exitcode::SOFTWARE
    })?;

    // Gracefully shutdown background tasks
    info!("HTTP server stopped, shutting down background tasks...");
    state.shutdown().await;

    info!(
        uptime_secs = state.uptime_seconds(),
        "Server shutdown complete"
    );
    Ok(())
}
