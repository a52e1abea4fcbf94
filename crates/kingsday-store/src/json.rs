//! JSON load/save primitives.
//!
//! These two functions implement the persistence contract: loads fall
//! back, saves propagate. All higher-level document access in
//! [`store`](crate::store) goes through them.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::StoreError;

/// Load a JSON document, returning `fallback` on any failure.
///
/// A missing file is the normal "not created yet" case and falls back
/// silently; a present-but-unreadable document is logged at debug level
/// before falling back.
pub fn load_or<T: DeserializeOwned>(path: &Path, fallback: T) -> T {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return fallback,
    };

    match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "unreadable document, using fallback");
            fallback
        }
    }
}

/// Write a document as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`StoreError`] if directory creation, serialization, or the
/// write itself fails.
pub fn save_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let body = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, body).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
