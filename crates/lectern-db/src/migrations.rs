use rusqlite::Connection;
use tracing::info;

use crate::Database;
use crate::error::Result;

/// Courses inserted on first run, before any admin has created one.
const DEFAULT_COURSES: [(&str, &str); 4] = [
    (
        "Introduction to Computer Science",
        "Foundational course covering basic programming concepts and computational thinking.",
    ),
    (
        "Data Structures and Algorithms",
        "In-depth exploration of fundamental data structures and algorithm design.",
    ),
    (
        "Web Development Fundamentals",
        "Comprehensive introduction to modern web development technologies.",
    ),
    (
        "Machine Learning Basics",
        "Introductory course to machine learning principles and practical applications.",
    ),
];

impl Database {
    /// Create the base tables. Safe to call on every startup.
    pub fn initialize(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute_batch(
                "
                CREATE TABLE IF NOT EXISTS users (
                    id          INTEGER PRIMARY KEY,
                    username    TEXT NOT NULL UNIQUE,
                    password    TEXT NOT NULL,
                    role        TEXT NOT NULL,
                    created_at  DATETIME DEFAULT CURRENT_TIMESTAMP
                );

                CREATE TABLE IF NOT EXISTS courses (
                    id             INTEGER PRIMARY KEY,
                    name           TEXT NOT NULL,
                    instructor_id  INTEGER REFERENCES users(id),
                    created_at     DATETIME DEFAULT CURRENT_TIMESTAMP
                );

                CREATE TABLE IF NOT EXISTS feedback (
                    id          INTEGER PRIMARY KEY,
                    course_id   INTEGER NOT NULL REFERENCES courses(id),
                    student_id  INTEGER NOT NULL REFERENCES users(id),
                    content     TEXT NOT NULL,
                    created_at  DATETIME DEFAULT CURRENT_TIMESTAMP
                );
                ",
            )?;
            Ok(())
        })?;
        info!("Database schema initialized");
        Ok(())
    }

    /// Additive column migrations. Each check is independent, and the whole
    /// call is a no-op once both columns exist. Must run after `initialize`
    /// and before `seed_defaults`.
    pub fn migrate(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            if !column_exists(conn, "courses", "description")? {
                info!("Migration: adding courses.description");
                conn.execute_batch("ALTER TABLE courses ADD COLUMN description TEXT")?;
            }

            if !column_exists(conn, "feedback", "rating")? {
                info!("Migration: adding feedback.rating");
                conn.execute_batch(
                    "ALTER TABLE feedback
                     ADD COLUMN rating INTEGER CHECK(rating BETWEEN 1 AND 5) DEFAULT 3",
                )?;
            }

            Ok(())
        })
    }

    /// Seed the stock courses. Gated on the courses table being empty, so
    /// every later startup is a no-op.
    pub fn seed_defaults(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))?;
            if count > 0 {
                return Ok(());
            }

            let mut stmt = conn.prepare(
                "INSERT INTO courses (name, description, instructor_id) VALUES (?1, ?2, NULL)",
            )?;
            for (name, description) in DEFAULT_COURSES {
                stmt.execute((name, description))?;
            }

            info!("Seeded {} default courses", DEFAULT_COURSES.len());
            Ok(())
        })
    }
}

/// Column presence via the SQLite catalog.
fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
