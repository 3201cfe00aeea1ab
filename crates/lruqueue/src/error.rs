//! Error types for lruqueue and lrucache

use std::fmt;

/// Result type alias for queue and cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for queue and cache operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Key not found
    NotFound,

    /// Capacity must be at least 1
    InvalidCapacity(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "key not found"),
            Error::InvalidCapacity(cap) => {
                write!(f, "invalid capacity: {} (must be at least 1)", cap)
            }
        }
    }
}

impl std::error::Error for Error {}
