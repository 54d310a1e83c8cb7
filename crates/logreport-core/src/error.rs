use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read log data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report table: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid log name pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid report template: {0}")]
    InvalidTemplate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
