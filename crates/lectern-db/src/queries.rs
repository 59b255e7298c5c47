use rusqlite::{Connection, OptionalExtension};

use crate::Database;
use crate::auth;
use crate::error::{Result, StoreError};
use crate::models::{CourseRow, CourseSummary, FeedbackEntry, UserRow};

/// Shown in place of a course description that was never set. Substituted
/// only for NULL, never for an empty string.
pub const NO_DESCRIPTION: &str = "No description available";

const MIN_PASSWORD_LEN: usize = 8;

impl Database {
    // -- Users --

    /// Insert a new user. The role is stored verbatim; route-level gating is
    /// the caller's concern.
    pub fn register_user(&self, username: &str, password: &str, role: &str) -> Result<i64> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(StoreError::PasswordTooShort);
        }

        let password_hash = auth::hash_password(password)?;

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
                (username, password_hash.as_str(), role),
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    StoreError::UsernameTaken
                }
                other => other.into(),
            })?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Look up the user and verify the password against the stored hash.
    /// A failed login is `None`, never an error.
    pub fn authenticate_user(&self, username: &str, password: &str) -> Result<Option<UserRow>> {
        let Some(user) = self.get_user_by_username(username)? else {
            return Ok(None);
        };

        if auth::verify_password(password, &user.password)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Courses --

    pub fn create_course(
        &self,
        name: &str,
        description: Option<&str>,
        instructor_id: Option<i64>,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO courses (name, description, instructor_id) VALUES (?1, ?2, ?3)",
                (name, description, instructor_id),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_courses(&self) -> Result<Vec<CourseSummary>> {
        self.with_conn(query_courses)
    }

    /// Description looked up by course id directly, with the same
    /// placeholder substitution as `list_courses`.
    pub fn course_description(&self, course_id: i64) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let description = conn
                .query_row(
                    "SELECT COALESCE(description, ?1) FROM courses WHERE id = ?2",
                    (NO_DESCRIPTION, course_id),
                    |row| row.get(0),
                )
                .optional()?;
            Ok(description)
        })
    }

    pub fn courses_for_instructor(&self, instructor_id: i64) -> Result<Vec<CourseRow>> {
        self.with_conn(|conn| query_courses_for_instructor(conn, instructor_id))
    }

    // -- Feedback --

    /// Insert one feedback row. `rating: None` omits the column so the
    /// schema default applies; out-of-range ratings are left to the CHECK
    /// constraint and surface as `StoreError::Sqlite`.
    pub fn submit_feedback(
        &self,
        course_id: i64,
        student_id: i64,
        content: &str,
        rating: Option<i64>,
    ) -> Result<i64> {
        if content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        self.with_conn_mut(|conn| {
            match rating {
                Some(rating) => conn.execute(
                    "INSERT INTO feedback (course_id, student_id, content, rating)
                     VALUES (?1, ?2, ?3, ?4)",
                    (course_id, student_id, content, rating),
                )?,
                None => conn.execute(
                    "INSERT INTO feedback (course_id, student_id, content) VALUES (?1, ?2, ?3)",
                    (course_id, student_id, content),
                )?,
            };
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_feedback_for_course(&self, course_id: i64) -> Result<Vec<FeedbackEntry>> {
        self.with_conn(|conn| query_feedback_for_course(conn, course_id))
    }

    /// Deleting an id that does not exist is still success.
    pub fn delete_feedback(&self, feedback_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM feedback WHERE id = ?1", [feedback_id])?;
            Ok(())
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password, role, created_at FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                role: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_courses(conn: &Connection) -> Result<Vec<CourseSummary>> {
    let mut stmt =
        conn.prepare("SELECT id, name, COALESCE(description, ?1) FROM courses ORDER BY id")?;

    let rows = stmt
        .query_map([NO_DESCRIPTION], |row| {
            Ok(CourseSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_courses_for_instructor(conn: &Connection, instructor_id: i64) -> Result<Vec<CourseRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, instructor_id, created_at
         FROM courses
         WHERE instructor_id = ?1
         ORDER BY id",
    )?;

    let rows = stmt
        .query_map([instructor_id], |row| {
            Ok(CourseRow {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                instructor_id: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_feedback_for_course(conn: &Connection, course_id: i64) -> Result<Vec<FeedbackEntry>> {
    // JOIN users to fetch the submitter's username in a single query.
    let mut stmt = conn.prepare(
        "SELECT f.id, u.username, f.content, f.rating, f.created_at
         FROM feedback f
         JOIN users u ON f.student_id = u.id
         WHERE f.course_id = ?1
         ORDER BY f.id",
    )?;

    let rows = stmt
        .query_map([course_id], |row| {
            Ok(FeedbackEntry {
                id: row.get(0)?,
                submitter_username: row.get(1)?,
                content: row.get(2)?,
                rating: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fresh in-memory store with the full startup sequence applied.
    fn open_store() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db.migrate().unwrap();
        db.seed_defaults().unwrap();
        db
    }

    #[test]
    fn register_rejects_short_password() {
        let db = open_store();

        let err = db.register_user("bob", "seven77", "student").unwrap_err();
        assert!(matches!(err, StoreError::PasswordTooShort));

        // Eight characters is enough.
        db.register_user("bob", "eight888", "student").unwrap();
    }

    #[test]
    fn register_rejects_duplicate_username() {
        let db = open_store();
        db.register_user("alice", "password1", "student").unwrap();

        // Different password and role make no difference.
        let err = db
            .register_user("alice", "different9", "admin")
            .unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken));
    }

    #[test]
    fn register_stores_role_verbatim() {
        let db = open_store();
        db.register_user("eve", "password1", "auditor").unwrap();

        let user = db.get_user_by_username("eve").unwrap().unwrap();
        assert_eq!(user.role, "auditor");
    }

    #[test]
    fn authenticate_checks_credentials() {
        let db = open_store();
        db.register_user("alice", "password1", "student").unwrap();

        let user = db.authenticate_user("alice", "password1").unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, "student");

        assert!(db.authenticate_user("alice", "password2").unwrap().is_none());
        assert!(db.authenticate_user("nobody", "password1").unwrap().is_none());
    }

    #[test]
    fn missing_description_gets_placeholder() {
        let db = open_store();
        let id = db.create_course("Compilers", None, None).unwrap();

        let courses = db.list_courses().unwrap();
        let course = courses.iter().find(|c| c.id == id).unwrap();
        assert_eq!(course.description, NO_DESCRIPTION);

        assert_eq!(db.course_description(id).unwrap().unwrap(), NO_DESCRIPTION);
    }

    #[test]
    fn empty_description_is_not_substituted() {
        let db = open_store();
        let id = db.create_course("Compilers", Some(""), None).unwrap();

        let course = db
            .list_courses()
            .unwrap()
            .into_iter()
            .find(|c| c.id == id)
            .unwrap();
        assert_eq!(course.description, "");
    }

    #[test]
    fn course_description_for_unknown_id_is_none() {
        let db = open_store();
        assert!(db.course_description(999_999).unwrap().is_none());
    }

    #[test]
    fn courses_for_instructor_filters_by_owner() {
        let db = open_store();
        let instructor = db
            .register_user("turing", "password1", "instructor")
            .unwrap();

        let id = db
            .create_course("Computability", Some("Halting and friends."), Some(instructor))
            .unwrap();

        let mine = db.courses_for_instructor(instructor).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, id);
        assert_eq!(mine[0].instructor_id, Some(instructor));

        // Seeded courses have no instructor and never show up here.
        assert!(db.courses_for_instructor(instructor + 1).unwrap().is_empty());
    }

    #[test]
    fn feedback_rejects_blank_content() {
        let db = open_store();
        let student = db.register_user("alice", "password1", "student").unwrap();

        let err = db.submit_feedback(1, student, "   ", Some(4)).unwrap_err();
        assert!(matches!(err, StoreError::EmptyContent));
    }

    #[test]
    fn rating_out_of_range_is_a_constraint_failure() {
        let db = open_store();
        let student = db.register_user("alice", "password1", "student").unwrap();

        let err = db
            .submit_feedback(1, student, "Great course", Some(6))
            .unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
        assert!(db.list_feedback_for_course(1).unwrap().is_empty());
    }

    #[test]
    fn omitted_rating_defaults_to_three() {
        let db = open_store();
        let student = db.register_user("alice", "password1", "student").unwrap();

        db.submit_feedback(1, student, "Solid", None).unwrap();

        let feedback = db.list_feedback_for_course(1).unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].rating, 3);
    }

    #[test]
    fn feedback_requires_an_existing_course() {
        let db = open_store();
        let student = db.register_user("alice", "password1", "student").unwrap();

        let err = db
            .submit_feedback(999_999, student, "Good", Some(4))
            .unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn delete_feedback_is_idempotent() {
        let db = open_store();
        db.delete_feedback(999_999).unwrap();
    }

    #[test]
    fn feedback_round_trip() {
        let db = open_store();

        let student = db.register_user("alice", "password1", "student").unwrap();
        let user = db.authenticate_user("alice", "password1").unwrap().unwrap();
        assert_eq!(user.id, student);

        let feedback_id = db.submit_feedback(1, user.id, "Good", Some(5)).unwrap();

        let feedback = db.list_feedback_for_course(1).unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].id, feedback_id);
        assert_eq!(feedback[0].submitter_username, "alice");
        assert_eq!(feedback[0].content, "Good");
        assert_eq!(feedback[0].rating, 5);

        db.delete_feedback(feedback_id).unwrap();
        assert!(db.list_feedback_for_course(1).unwrap().is_empty());

        // Second delete of the same id is still fine.
        db.delete_feedback(feedback_id).unwrap();
    }
}
