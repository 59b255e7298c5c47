use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use lectern_types::api::{Claims, CourseResponse, CreateCourseRequest};
use lectern_types::models::Course;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::require_role;
use crate::parse_created_at;

pub async fn list_courses(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_courses()).await??;

    let courses: Vec<CourseResponse> = rows
        .into_iter()
        .map(|row| CourseResponse {
            id: row.id,
            name: row.name,
            description: row.description,
        })
        .collect();

    Ok(Json(courses))
}

pub async fn create_course(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&claims, "admin")?;

    let db = state.clone();
    let id = tokio::task::spawn_blocking(move || {
        db.db
            .create_course(&req.name, req.description.as_deref(), req.instructor_id)
    })
    .await??;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Courses taught by the calling instructor.
pub async fn my_courses(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&claims, "instructor")?;

    let db = state.clone();
    let instructor_id = claims.sub;
    let rows =
        tokio::task::spawn_blocking(move || db.db.courses_for_instructor(instructor_id)).await??;

    let courses: Vec<Course> = rows
        .into_iter()
        .map(|row| Course {
            id: row.id,
            name: row.name,
            description: row.description,
            instructor_id: row.instructor_id,
            created_at: parse_created_at(&row.created_at),
        })
        .collect();

    Ok(Json(courses))
}
