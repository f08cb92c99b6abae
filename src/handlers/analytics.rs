//! Analytics route group.

use axum::routing::get;
use axum::{Json, Router};

use crate::models::{AnalyticsData, Success};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(user_analytics))
}

/// `GET /api/v1/analytics/users`
async fn user_analytics() -> Json<Success<AnalyticsData>> {
    // Aggregation runs in the reporting store, outside this crate.
    Json(Success::with_data(
        "Analytics fetched",
        AnalyticsData {
            users_count: 0,
            orders_count: 0,
        },
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_analytics_envelope() {
        let Json(envelope) = user_analytics().await;

        assert!(envelope.success);
        assert_eq!(envelope.message, "Analytics fetched");
    }
}
