use thiserror::Error;

/// Errors that can occur within the schedule subsystem.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A rotation needs at least one week per cycle.
    #[error("Invalid cycle length: {0} (must be at least 1 week)")]
    InvalidCycleLength(u32),

    /// The submitted grid cannot be stored as-is.
    #[error("Invalid schedule: {0}")]
    Validation(String),
}

impl ScheduleError {
    /// True when the failure came from the caller's input rather than the store.
    ///
    /// SQLite constraint violations (duplicate slot, NOT NULL) count as input errors.
    pub fn is_client_error(&self) -> bool {
        match self {
            ScheduleError::InvalidCycleLength(_) | ScheduleError::Validation(_) => true,
            ScheduleError::Database(rusqlite::Error::SqliteFailure(e, _)) => {
                e.code == rusqlite::ErrorCode::ConstraintViolation
            }
            ScheduleError::Database(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
