//! Storage error handling
//!
//! Two layers:
//! - `StorageError`: what a backend reports, classified from I/O and SQLite
//!   errors with recovery suggestions.
//! - `PersistenceError`: what the persistence adapter hands to callers. It
//!   only distinguishes a full store from every other write failure, which
//!   is all a front end needs to pick a message.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by key-value backends
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Backend refused the key
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

impl StorageError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            _ if is_disk_full_error(&error) => StorageError::DiskFull {
                path,
                source: error,
            },
            _ => StorageError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Whether the backing medium ran out of space
    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            StorageError::DiskFull { .. } => true,
            StorageError::Database(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::DiskFull
            }
            _ => false,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            _ if self.is_quota_exceeded() => {
                Some("Export your data and free up some space, then try again.")
            }
            StorageError::PermissionDenied { .. } => {
                Some("Check file and directory permissions of the data directory.")
            }
            StorageError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for backend operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Failure to make a write durable
///
/// Never rolls back in-memory state; see `store::WriteOutcome`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The store is full
    #[error("Storage quota exceeded while saving '{key}': {details}")]
    QuotaExceeded { key: String, details: String },

    /// Any other failed write
    #[error("Failed to save '{key}': {details}")]
    WriteFailure { key: String, details: String },
}

impl PersistenceError {
    /// Fold a backend error into one of the two caller-facing kinds
    pub fn from_storage(key: impl Into<String>, error: StorageError) -> Self {
        let key = key.into();
        let mut details = error.to_string();
        if let Some(hint) = error.recovery_suggestion() {
            details = format!("{} {}", details, hint);
        }
        if error.is_quota_exceeded() {
            PersistenceError::QuotaExceeded { key, details }
        } else {
            PersistenceError::WriteFailure { key, details }
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, PersistenceError::QuotaExceeded { .. })
    }

    /// The storage key the failed write targeted
    pub fn key(&self) -> &str {
        match self {
            PersistenceError::QuotaExceeded { key, .. }
            | PersistenceError::WriteFailure { key, .. } => key,
        }
    }
}
