use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Store failure taxonomy. The three validation variants are
/// caller-correctable and their messages are shown to end users verbatim;
/// everything else is an internal failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Feedback content cannot be empty")]
    EmptyContent,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// True for input errors whose message is safe to surface to the client.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::PasswordTooShort | Self::UsernameTaken | Self::EmptyContent
        )
    }
}
