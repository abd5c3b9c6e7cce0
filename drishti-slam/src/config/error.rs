//! Configuration error types.

use thiserror::Error;

/// Config load error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoadError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Value parsed but out of range
    #[error("Invalid value: {0}")]
    Invalid(String),
}
