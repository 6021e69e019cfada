//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Address parsing or conversion failed.
    #[error("Address error: {0}")]
    Address(#[from] addrbook_address::Error),

    /// A pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// An alias with this name is already defined.
    #[error("Alias already exists: {0}")]
    AliasExists(String),

    /// No alias with this name is defined.
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
