use thiserror::Error;

/// Access-gate errors. The gateway maps the first three to 401 and
/// `Forbidden` to 403.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Refusing to sign tokens: {0}")]
    InsecureSecret(String),
}

pub type Result<T> = std::result::Result<T, AccessError>;
