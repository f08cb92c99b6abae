//! Course route group.

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{Failure, HandlerResult};
use crate::models::{CourseSummary, CoursesData, Success};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/{id}", get(get_course))
}

/// The seeded catalog. Real catalog data lives behind the persistence layer,
/// outside this crate.
fn catalog() -> Vec<CourseSummary> {
    vec![
        CourseSummary {
            id: 1,
            name: "Rust for Web Services".to_string(),
            level: "intermediate".to_string(),
        },
        CourseSummary {
            id: 2,
            name: "Async Fundamentals".to_string(),
            level: "beginner".to_string(),
        },
    ]
}

/// `GET /api/v1/courses`
async fn list_courses() -> Json<Success<CoursesData>> {
    Json(Success::with_data(
        "Courses fetched",
        CoursesData { courses: catalog() },
    ))
}

/// `GET /api/v1/courses/{id}`
async fn get_course(Path(id): Path<u32>) -> HandlerResult<Json<Success<CourseSummary>>> {
    let course = catalog()
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| Failure::not_found("Course not found"))?;

    Ok(Json(Success::with_data("Course fetched", course)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_returns_envelope() {
        let Json(envelope) = list_courses().await;

        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap().courses.len(), 2);
    }

    #[tokio::test]
    async fn test_get_unknown_course_raises_not_found() {
        let failure = get_course(Path(999)).await.err().unwrap();

        assert_eq!(failure.status, axum::http::StatusCode::NOT_FOUND);
        assert_eq!(failure.message, "Course not found");
    }

    #[tokio::test]
    async fn test_get_known_course() {
        let Json(envelope) = get_course(Path(1)).await.unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap().name, "Rust for Web Services");
    }
}
