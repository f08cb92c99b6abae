//! Shared application state for Axum handlers.
//!
//! The state is cheap to clone: configuration and the rate-limit window
//! store sit behind `Arc`. The window store is the only cross-request
//! mutable resource in the pipeline; everything else is read-only per
//! request.
//!
//! # Structured Concurrency
//!
//! Background tasks are managed with `tokio_util::task::TaskTracker` and a
//! `CancellationToken`. Call [`AppState::shutdown`] to stop them gracefully
//! before process exit.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::config::Config;
use crate::middleware::InMemoryWindowStore;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Rate-limit window state, shared with the limiter layer
    pub rate_windows: Arc<InMemoryWindowStore>,
    /// Timestamp when the application started
    pub started_at: Instant,
    /// Tracks spawned background tasks for graceful shutdown
    task_tracker: TaskTracker,
    /// Cancellation token for signaling background tasks to stop
    cancellation_token: CancellationToken,
}

impl AppState {
    /// Create application state and spawn its background tasks.
    ///
    /// When rate limiting is enabled this spawns a task that periodically
    /// prunes elapsed windows from the store, bounding its memory to clients
    /// active within the last window.
    pub fn new(config: Config) -> Self {
        let state = Self {
            config: Arc::new(config),
            rate_windows: Arc::new(InMemoryWindowStore::new()),
            started_at: Instant::now(),
            task_tracker: TaskTracker::new(),
            cancellation_token: CancellationToken::new(),
        };

        if state.config.rate_limiting_enabled() {
            state.spawn_window_prune_task();
        }

        state
    }

    /// Spawn the background window-pruning task.
    ///
    /// Only the store and window length are moved in, not the whole state.
    fn spawn_window_prune_task(&self) {
        let store = self.rate_windows.clone();
        let window = self.config.rate_limit_window;
        let cancel = self.cancellation_token.clone();

        self.task_tracker.spawn(async move {
            let mut ticker = interval(window);
            ticker.tick().await; // Skip the first immediate tick

            loop {
                tokio::select! {
                    biased; // Check cancellation first

                    _ = cancel.cancelled() => {
                        debug!("Window prune task received cancellation signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        let dropped = store.prune(Instant::now(), window);
                        if dropped > 0 {
                            debug!(dropped, "Pruned elapsed rate-limit windows");
                        }
                    }
                }
            }

            debug!("Window prune task shutting down");
        });
    }

    /// Gracefully shutdown all background tasks.
    ///
    /// Signals cancellation, closes the tracker, and waits for completion.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown of background tasks");

        self.cancellation_token.cancel();
        self.task_tracker.close();
        self.task_tracker.wait().await;

        info!("All background tasks have completed");
    }

    /// Get the application uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
