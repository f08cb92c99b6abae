//! Body decoding for route-group handlers.
//!
//! [`JsonBody`] wraps Axum's JSON extraction so every rejection speaks the
//! error envelope instead of Axum's plain-text defaults. The configured body
//! ceiling (`DefaultBodyLimit` in the router) is enforced here: an
//! over-ceiling payload fails with `PayloadTooLarge` before any handler
//! logic runs, and the body is never attached.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::Failure;

/// JSON request body, decoded ahead of handler logic.
///
/// ```ignore
/// async fn register(JsonBody(body): JsonBody<RegisterRequest>) -> HandlerResult<...> { ... }
/// ```
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(failure_from_rejection(rejection)),
        }
    }
}

/// Map an extraction rejection onto the failure taxonomy.
fn failure_from_rejection(rejection: JsonRejection) -> Failure {
    // Buffering failures surface the body-size ceiling as 413.
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Failure::payload_too_large();
    }

    match rejection {
        JsonRejection::JsonSyntaxError(_) => {
            Failure::bad_request("Malformed JSON in request body")
        }
        JsonRejection::JsonDataError(err) => {
            Failure::bad_request(sanitize_decode_message(&err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => {
            Failure::bad_request("Expected request with `Content-Type: application/json`")
        }
        _ => Failure::bad_request("Invalid request body"),
    }
}

/// Sanitize serde's decode messages before they reach clients.
///
/// Serde errors can contain internal struct or field names; only the parts
/// useful to a client debugging their payload are kept.
fn sanitize_decode_message(msg: &str) -> String {
    if msg.contains("missing field")
        && let Some(field) = backticked(msg)
    {
        return format!("Missing required field: {field}");
    }

    if msg.contains("unknown field")
        && let Some(field) = backticked(msg)
    {
        return format!("Unknown field: {field}");
    }

    if msg.contains("invalid type") {
        return "Invalid data type in request body".to_string();
    }

    "Invalid request format".to_string()
}

/// First backtick-quoted token in a serde error message.
fn backticked(msg: &str) -> Option<&str> {
    let start = msg.find('`')?;
    let rest = msg.get(start + 1..)?;
    let end = rest.find('`')?;
    rest.get(..end)
}
