//! Error types for the daydeck ecosystem.

use thiserror::Error;

/// Errors that can occur in daydeck operations.
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Unknown task list '{0}' (expected today, checklist or yesterday)")]
    UnknownTaskList(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for daydeck operations.
pub type DeckResult<T> = Result<T, DeckError>;
