//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by snapshot stores and the autosaver.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A stored document is not a valid snapshot.
    #[error("stored snapshot `{key}` is invalid: {source}")]
    Json {
        /// Storage key.
        key: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The key cannot be used as a file name.
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),

    /// The autosave task is no longer running.
    #[error("autosave task has stopped")]
    Closed,
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(key: &str, source: serde_json::Error) -> Self {
        Self::Json {
            key: key.to_string(),
            source,
        }
    }
}
