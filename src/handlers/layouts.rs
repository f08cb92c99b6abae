//! Layout route group.

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{Failure, HandlerResult};
use crate::models::{LayoutData, Success};
use crate::state::AppState;

/// Layout kinds the platform's pages know how to render.
const LAYOUT_KINDS: [&str; 3] = ["banner", "faq", "categories"];

pub fn router() -> Router<AppState> {
    Router::new().route("/{kind}", get(get_layout))
}

/// `GET /api/v1/layouts/{kind}`
async fn get_layout(Path(kind): Path<String>) -> HandlerResult<Json<Success<LayoutData>>> {
    if !LAYOUT_KINDS.contains(&kind.as_str()) {
        return Err(Failure::bad_request("Invalid layout type"));
    }

    Ok(Json(Success::with_data(
        "Layout fetched",
        LayoutData {
            kind,
            items: Vec::new(),
        },
    )))
}
