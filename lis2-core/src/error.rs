use thiserror::Error;

/// Main error type for lis2 operations
#[derive(Error, Debug)]
pub enum Lis2Error {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timeout")]
    Timeout,

    #[error("Frame invalid: {0}")]
    FrameInvalid(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for lis2 operations
pub type Lis2Result<T> = Result<T, Lis2Error>;
