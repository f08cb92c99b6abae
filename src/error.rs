use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::ErrorBody;

/// Discriminates where in the pipeline a failure originated.
///
/// Rate-limit rejections are deliberately absent: the rate limiter writes
/// its fixed response body directly and never raises a `Failure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Request body exceeded the configured size ceiling.
    PayloadTooLarge,
    /// No route group claimed the request path.
    RouteNotFound,
    /// Raised inside a route group's own logic.
    Handler,
    /// Anything raised without an explicit status code.
    Unhandled,
}

impl FailureKind {
    /// Stable label used for logging and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::PayloadTooLarge => "payload_too_large",
            FailureKind::RouteNotFound => "route_not_found",
            FailureKind::Handler => "handler",
            FailureKind::Unhandled => "unhandled",
        }
    }
}

/// A failure raised by any pipeline stage or route group.
///
/// Every `Failure` carries an explicit kind, HTTP status, and client-facing
/// message, constructed at the raise site. Conversion into a response happens
/// in exactly one place, the [`IntoResponse`] impl below, which emits the
/// uniform `{"success":false,"message":...}` envelope. Axum writes at most
/// one response per request, so a raised failure is never double-handled.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub status: StatusCode,
    pub message: String,
}

impl Failure {
    /// Body exceeded the configured ceiling. Matches the wording clients of
    /// the previous deployment already handle.
    pub fn payload_too_large() -> Self {
        Self {
            kind: FailureKind::PayloadTooLarge,
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "Request entity too large".to_string(),
        }
    }

    /// No route group owns `path`.
    pub fn route_not_found(path: &str) -> Self {
        Self {
            kind: FailureKind::RouteNotFound,
            status: StatusCode::NOT_FOUND,
            message: format!("Route {path} not found"),
        }
    }

    /// Route-group failure with an explicit status code.
    ///
    /// An out-of-range status falls back to 500, so a sloppy raise site can
    /// never produce an unwritable response.
    pub fn handler(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Handler,
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Handler,
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Handler,
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Handler,
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Failure without a meaningful status; surfaces as 500.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Unhandled,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

/// Terminal error translation: the only place a failure becomes a response.
impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let message = if self.message.trim().is_empty() {
            "Internal server error".to_string()
        } else {
            self.message
        };

        // Log server-side; the client only ever sees the envelope.
        if self.status.is_server_error() {
            tracing::error!(
                kind = self.kind.as_str(),
                status = self.status.as_u16(),
                message = %message,
                "request failed"
            );
        } else {
            tracing::warn!(
                kind = self.kind.as_str(),
                status = self.status.as_u16(),
                message = %message,
                "request rejected"
            );
        }

        crate::metrics::record_failure(self.kind.as_str(), self.status.as_u16());

        (self.status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Convenience type alias for route-group handlers.
pub type HandlerResult<T> = Result<T, Failure>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_route_not_found_message() {
        let failure = Failure::route_not_found("/api/v1/does-not-exist");
        assert_eq!(failure.status, StatusCode::NOT_FOUND);
        assert_eq!(failure.kind, FailureKind::RouteNotFound);
        assert_eq!(failure.message, "Route /api/v1/does-not-exist not found");
    }

    #[test]
    fn test_handler_invalid_status_defaults_to_500() {
        let failure = Failure::handler(1, "broken");
        assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_handler_keeps_explicit_status() {
        let failure = Failure::handler(403, "forbidden");
        assert_eq!(failure.status, StatusCode::FORBIDDEN);
        assert_eq!(failure.kind, FailureKind::Handler);
    }

    #[test]
    fn test_payload_too_large_status() {
        let failure = Failure::payload_too_large();
        assert_eq!(failure.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(failure.kind, FailureKind::PayloadTooLarge);
    }

    #[test]
    fn test_empty_message_translates_to_default() {
        let response = Failure::internal("").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_kind_labels_are_stable() {
        assert_eq!(FailureKind::PayloadTooLarge.as_str(), "payload_too_large");
        assert_eq!(FailureKind::RouteNotFound.as_str(), "route_not_found");
        assert_eq!(FailureKind::Handler.as_str(), "handler");
        assert_eq!(FailureKind::Unhandled.as_str(), "unhandled");
    }
}
