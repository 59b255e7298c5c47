pub mod auth;
pub mod courses;
pub mod error;
pub mod feedback;
pub mod middleware;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

/// SQLite stores `CURRENT_TIMESTAMP` as "YYYY-MM-DD HH:MM:SS" with no
/// timezone. Accept either that naive form (as UTC) or RFC 3339.
pub fn parse_created_at(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}': {}", raw, e);
            DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_sqlite_naive_timestamps_as_utc() {
        let ts = parse_created_at("2026-08-07 14:30:00");
        assert_eq!(ts.year(), 2026);
        assert_eq!(ts.month(), 8);
        assert_eq!(ts.hour(), 14);
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let ts = parse_created_at("2026-08-07T14:30:00Z");
        assert_eq!(ts.day(), 7);
    }

    #[test]
    fn corrupt_timestamps_fall_back_to_the_epoch() {
        assert_eq!(parse_created_at("not a date"), DateTime::<Utc>::default());
    }
}
