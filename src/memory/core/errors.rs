//! Error types for the import pipeline.

use thiserror::Error;

/// Import pipeline error type.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The archive is valid JSON but not the expected export shape.
    #[error("invalid conversation archive: {0}")]
    InvalidArchive(String),
    /// An episode that would break a store invariant.
    #[error("invalid episode: {0}")]
    InvalidEpisode(String),
    /// `SQLite` storage error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Serialization error (malformed archive JSON).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Salience pattern failed to compile.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl MemoryError {
    /// Whether the error came from the store rather than the input.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Sqlite(_) | Self::InvalidEpisode(_))
    }
}

/// Convenience result alias for import operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
