//! Errors raised by the local library store

use thiserror::Error;

use super::models::PlaylistId;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

#[derive(Error, Debug)]
pub enum LibraryError {
    /// SQLite errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Settings (de)serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// I/O errors while preparing the data directory
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A blocking database task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),
}

impl LibraryError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }
}
