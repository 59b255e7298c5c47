//! Row types crossing the store boundary. One struct per result shape,
//! never positional tuples. Timestamps stay as the TEXT SQLite hands back;
//! callers parse them at the edge.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    /// PHC-format Argon2 hash, not a plaintext password.
    pub password: String,
    pub role: String,
    pub created_at: String,
}

pub struct CourseRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: Option<i64>,
    pub created_at: String,
}

/// Course listing shape; `description` is already placeholder-substituted.
pub struct CourseSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Feedback joined with the submitting user.
pub struct FeedbackEntry {
    pub id: i64,
    pub submitter_username: String,
    pub content: String,
    pub rating: i64,
    pub created_at: String,
}
