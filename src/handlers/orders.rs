//! Order route group.

use axum::routing::post;
use axum::{Json, Router};
use uuid::Uuid;

use crate::error::{Failure, HandlerResult};
use crate::extract::JsonBody;
use crate::models::{CreateOrderRequest, OrderData, Success};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_order))
}

/// `POST /api/v1/orders`
async fn create_order(
    JsonBody(body): JsonBody<CreateOrderRequest>,
) -> HandlerResult<Json<Success<OrderData>>> {
    if body.course_id.trim().is_empty() {
        return Err(Failure::bad_request("course_id is required"));
    }

    Ok(Json(Success::with_data(
        "Order placed",
        OrderData {
            order_id: Uuid::new_v4(),
            course_id: body.course_id,
        },
    )))
}
