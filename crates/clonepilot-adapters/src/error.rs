//! Error types for adapter construction and configuration
//!
//! Trait calls report failures through `clonepilot_core::CollaboratorError`;
//! the variants here cover everything that can go wrong before an adapter is
//! wired into a `Services` bundle.

use thiserror::Error;

/// Adapter error types
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The curated library file could not be read or parsed
    #[error("Library error: {0}")]
    LibraryError(String),
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        AdapterError::LibraryError(err.to_string())
    }
}

impl From<csv::Error> for AdapterError {
    fn from(err: csv::Error) -> Self {
        AdapterError::LibraryError(err.to_string())
    }
}
