use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No schedule with the given owner + identifier exists.
    #[error("schedule not found")]
    ScheduleNotFound { user_id: i64, schedule_id: i64 },
}

pub type Result<T> = std::result::Result<T, StoreError>;
