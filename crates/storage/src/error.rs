use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A result has already been submitted for match {0}")]
    DuplicateResult(i64),

    #[error("Bot {0} is not currently in this match")]
    BotNotInMatch(String),

    #[error("The ladder is currently disabled")]
    LadderDisabled,

    #[error("There are no active maps available")]
    NoMapsAvailable,

    #[error("Not enough active bots to generate a round")]
    InsufficientActiveBots,

    #[error("The current season is paused")]
    SeasonPaused,

    #[error("The current season is closing; no new rounds may be generated")]
    SeasonClosing,

    #[error("The maximum number of active rounds has been reached")]
    TooManyActiveRounds,
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// SQLite reports unique-index violations as SQLITE_CONSTRAINT with
    /// extended codes 1555 (rowid) or 2067 (unique index).
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if matches!(e.code().as_deref(), Some("1555") | Some("2067"))
        )
    }

    /// True when the request conflicts with already-committed state and
    /// retrying it verbatim can never succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StorageError::DuplicateResult(_) | StorageError::BotNotInMatch(_)
        )
    }
}
