use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The uniform success envelope: `{"success":true,"message":...,...data}`.
///
/// Route groups never write a raw body; they return this (or raise a
/// `Failure`, whose translation produces [`ErrorBody`]). The optional `data`
/// payload is flattened into the envelope so clients see a single flat
/// object.
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize = ()> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl Success<()> {
    /// Envelope carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> Success<T> {
    /// Envelope carrying a message plus a flattened data payload.
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// The uniform error envelope: `{"success":false,"message":...}`.
///
/// Written only by the error translator and the rate limiter.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

// =============================================================================
// Route-group payloads
// =============================================================================

/// Request to register a new user account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
}

/// Public profile fields returned by the user group.
#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub name: String,
    pub email: String,
}

/// Catalog entry returned by the course group.
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub id: u32,
    pub name: String,
    pub level: String,
}

#[derive(Debug, Serialize)]
pub struct CoursesData {
    pub courses: Vec<CourseSummary>,
}

/// Request to place an order for a course.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub course_id: String,
}

#[derive(Debug, Serialize)]
pub struct OrderData {
    pub order_id: Uuid,
    pub course_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationData {
    pub id: u32,
    pub title: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct NotificationsData {
    pub notifications: Vec<NotificationData>,
}

/// Aggregate counters returned by the analytics group.
#[derive(Debug, Serialize)]
pub struct AnalyticsData {
    pub users_count: u64,
    pub orders_count: u64,
}

/// A named page layout returned by the layout group.
#[derive(Debug, Serialize)]
pub struct LayoutData {
    pub kind: String,
    pub items: Vec<String>,
}
