use thiserror::Error;

/// Core error type shared across mocksmith crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a schema document failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A schema document could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Convenience alias for results returned by mocksmith crates.
pub type Result<T> = std::result::Result<T, Error>;
