use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::User;

// -- Token claims --

/// Bearer-token claims shared by the auth handlers (encoding) and the
/// middleware (decoding). Canonical definition lives here to eliminate
/// duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

// -- Courses --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCourseRequest {
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: i64,
    pub name: String,
    /// Placeholder-substituted when the course has no description.
    pub description: String,
}

// -- Feedback --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitFeedbackRequest {
    pub content: String,
    /// Omitted ratings fall back to the store default of 3.
    pub rating: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub id: i64,
    pub submitter_username: String,
    pub content: String,
    pub rating: i64,
    pub created_at: DateTime<Utc>,
}
