//! Error types for the persistence layer.
//!
//! Reads never produce errors -- a missing or corrupt document loads as
//! its fallback default. [`StoreError`] covers the write path only,
//! which is the one category of hard failure in the system.

use std::path::PathBuf;

/// Errors that can occur when writing persisted documents.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Writing a document to disk failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Creating a parent directory failed.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// The directory path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Removing a runtime file failed during reset.
    #[error("failed to remove {path}: {source}")]
    Remove {
        /// The file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Serializing a document to JSON failed.
    #[error("failed to serialize document for {path}: {source}")]
    Serialize {
        /// The destination path.
        path: PathBuf,
        /// The underlying serde error.
        source: serde_json::Error,
    },
}
