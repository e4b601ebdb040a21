use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrewdeckError {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CrewdeckError {
    /// Short machine-readable code, logged next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            CrewdeckError::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, CrewdeckError>;
