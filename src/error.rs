//! Error types for vault context building

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, ContextError>;

/// Errors raised while scanning, persisting or configuring vault context
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Invalid context record: {0}")]
    InvalidRecord(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ContextError {
    /// True when the error came from the underlying filesystem or note source
    pub fn is_io(&self) -> bool {
        matches!(self, ContextError::Io(_) | ContextError::NoteNotFound(_))
    }
}
