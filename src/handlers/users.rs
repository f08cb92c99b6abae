//! User route group.

use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::{Failure, HandlerResult};
use crate::extract::JsonBody;
use crate::middleware::Cookies;
use crate::models::{ProfileData, RegisterRequest, Success};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/me", get(profile))
}

/// `POST /api/v1/users/register`
async fn register(
    JsonBody(body): JsonBody<RegisterRequest>,
) -> HandlerResult<Json<Success<ProfileData>>> {
    if body.name.trim().is_empty() {
        return Err(Failure::bad_request("Name is required"));
    }
    if !body.email.contains('@') {
        return Err(Failure::bad_request("A valid email is required"));
    }

    Ok(Json(Success::with_data(
        format!("Activation email sent to {}", body.email),
        ProfileData {
            name: body.name,
            email: body.email,
        },
    )))
}

/// `GET /api/v1/users/me`
///
/// Reads the session cookie attached by the cookie decoder.
async fn profile(cookies: Cookies) -> HandlerResult<Json<Success<ProfileData>>> {
    let token = cookies
        .get("access_token")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Failure::unauthorized("Please login to access this resource"))?;

    // Session lookup lives outside this crate; the token only gates access.
    let _ = token;
    Ok(Json(Success::with_data(
        "Profile fetched",
        ProfileData {
            name: "Demo User".to_string(),
            email: "demo@example.com".to_string(),
        },
    )))
}
