//! Error types for meshpipe

use thiserror::Error;

/// Main error type for meshpipe operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for meshpipe operations
pub type Result<T> = std::result::Result<T, Error>;
