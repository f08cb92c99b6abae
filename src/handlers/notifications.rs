//! Notification route group.

use axum::routing::get;
use axum::{Json, Router};

use crate::models::{NotificationData, NotificationsData, Success};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_notifications))
}

/// `GET /api/v1/notifications`
async fn list_notifications() -> Json<Success<NotificationsData>> {
    let notifications = vec![NotificationData {
        id: 1,
        title: "Welcome to the platform".to_string(),
        status: "unread".to_string(),
    }];

    Json(Success::with_data(
        "Notifications fetched",
        NotificationsData { notifications },
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notifications_envelope() {
        let Json(envelope) = list_notifications().await;

        assert!(envelope.success);
        assert_eq!(envelope.message, "Notifications fetched");
        assert_eq!(envelope.data.unwrap().notifications.len(), 1);
    }
}
