use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use lectern_types::api::{Claims, FeedbackResponse, SubmitFeedbackRequest};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::require_role;
use crate::parse_created_at;

pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // The submitter is always the token subject; a client cannot file
    // feedback on another student's behalf.
    let db = state.clone();
    let student_id = claims.sub;
    let id = tokio::task::spawn_blocking(move || {
        db.db
            .submit_feedback(course_id, student_id, &req.content, req.rating)
    })
    .await??;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

pub async fn course_feedback(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    if claims.role != "instructor" && claims.role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let db = state.clone();
    let rows =
        tokio::task::spawn_blocking(move || db.db.list_feedback_for_course(course_id)).await??;

    let feedback: Vec<FeedbackResponse> = rows
        .into_iter()
        .map(|row| FeedbackResponse {
            id: row.id,
            submitter_username: row.submitter_username,
            content: row.content,
            rating: row.rating,
            created_at: parse_created_at(&row.created_at),
        })
        .collect();

    Ok(Json(feedback))
}

pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&claims, "admin")?;

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.delete_feedback(feedback_id)).await??;

    // Idempotent: a missing id still deletes to NO_CONTENT.
    Ok(StatusCode::NO_CONTENT)
}
