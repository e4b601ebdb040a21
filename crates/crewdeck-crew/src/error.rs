use thiserror::Error;

/// All crew-layer errors. Kept separate from CrewdeckError so the gateway
/// can map them to HTTP status codes without coupling layers.
#[derive(Debug, Error)]
pub enum CrewError {
    #[error("Crew member not found: {0}")]
    NotFound(i64),

    #[error("Invalid crew record: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
}

impl CrewError {
    /// True when the caller's input is at fault, including constraint violations.
    pub fn is_client_error(&self) -> bool {
        match self {
            CrewError::Validation(_) => true,
            CrewError::DatabaseError(rusqlite::Error::SqliteFailure(e, _)) => {
                e.code == rusqlite::ErrorCode::ConstraintViolation
            }
            CrewError::NotFound(_) | CrewError::DatabaseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CrewError>;
