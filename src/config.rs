//! Application configuration loaded from environment variables.
//!
//! All configuration is loaded from environment variables with defaults
//! matching the platform's reference policy. In production, configure via
//! environment variables or a `.env` file.
//!
//! # Ingress Policy
//!
//! - `CORS_ALLOWED_ORIGINS`: Comma-separated allow-list of origins
//! - `CORS_ALLOW_CREDENTIALS`: Whether cookies may be exchanged cross-origin
//! - `MAX_BODY_BYTES`: Request payload ceiling (default: 50MB)
//! - `RATE_LIMIT_MAX`: Requests per client per window (default: 100, 0 disables)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length (default: 900)

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Error raised when the environment holds an unusable configuration.
#[derive(Debug, Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(String);

/// Application configuration loaded from environment variables.
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 8000)
    pub port: u16,

    // =========================================================================
    // Access-Control Configuration
    // =========================================================================
    /// Origins permitted to receive responses cross-origin.
    ///
    /// Defaults to the platform's web clients. An origin not in this list
    /// never receives permissive access-control headers, on any response.
    pub allowed_origins: Vec<String>,

    /// Whether cookie/auth exchange is permitted cross-origin (default: true)
    pub cors_allow_credentials: bool,

    // =========================================================================
    // Body Decoding Configuration
    // =========================================================================
    /// Request payload ceiling in bytes (default: 50MB).
    /// Payloads above this fail with 413 before reaching any handler.
    pub max_body_bytes: usize,

    // =========================================================================
    // Rate Limiting Configuration
    // =========================================================================
    /// Requests allowed per client per window (default: 100).
    /// Set to 0 to disable rate limiting.
    pub rate_limit_max: u32,

    /// Fixed window length (default: 15 minutes)
    pub rate_limit_window: Duration,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Log level (e.g., "info", "debug", "trace")
    pub log_level: String,

    /// Port for the Prometheus metrics endpoint (default: 9090, 0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with reference-policy
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any value is malformed (e.g. non-numeric
    /// `PORT`) or inconsistent (see [`validate`](Self::validate)).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 8000)?,

            allowed_origins: Self::parse_origins(),
            cors_allow_credentials: Self::parse_env("CORS_ALLOW_CREDENTIALS", true)?,

            max_body_bytes: Self::parse_env("MAX_BODY_BYTES", 50 * 1024 * 1024)?, // 50MB

            rate_limit_max: Self::parse_env("RATE_LIMIT_MAX", 100)?,
            rate_limit_window: Duration::from_secs(Self::parse_env(
                "RATE_LIMIT_WINDOW_SECS",
                15 * 60,
            )?),

            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            metrics_port: Self::parse_env("METRICS_PORT", 9090)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError(
                "MAX_BODY_BYTES must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit_max > 0 && self.rate_limit_window.is_zero() {
            return Err(ConfigError(
                "RATE_LIMIT_WINDOW_SECS must be greater than 0 when rate limiting is enabled"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if rate limiting is enabled.
    pub fn rate_limiting_enabled(&self) -> bool {
        self.rate_limit_max > 0
    }

    /// Get the metrics endpoint address, or `None` if disabled (port = 0).
    pub fn metrics_addr(&self) -> Option<std::net::SocketAddr> {
        if self.metrics_port > 0 {
            Some(std::net::SocketAddr::from((
                [0, 0, 0, 0],
                self.metrics_port,
            )))
        } else {
            None
        }
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .parse()
                .map_err(|e| ConfigError(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }

    /// Parse the origin allow-list from `CORS_ALLOWED_ORIGINS`.
    fn parse_origins() -> Vec<String> {
        env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| Self::default_origins().join(","))
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// The platform's web clients.
    fn default_origins() -> Vec<String> {
        vec![
            "http://localhost:3000".to_string(),
            "https://elearninglms.netlify.app".to_string(),
        ]
    }
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: Self::default_origins(),
            cors_allow_credentials: true,
            max_body_bytes: 50 * 1024 * 1024, // 50MB
            rate_limit_max: 100,
            rate_limit_window: Duration::from_secs(15 * 60),
            log_level: "info".to_string(),
            metrics_port: 9090,
        }
    }
}
