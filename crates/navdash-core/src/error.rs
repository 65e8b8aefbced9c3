//! Core error types
//!
//! Mutation, import and settings failures. Storage failures live in
//! `storage::error` because they never abort an in-memory mutation.

use thiserror::Error;

use crate::models::EntityKind;

/// Errors returned by core operations
///
/// A failed operation leaves the collections untouched.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Mutation referenced an id that does not exist
    #[error("{kind} with id {id} not found")]
    NotFound { kind: EntityKind, id: String },

    /// Reorder indices out of bounds
    #[error("Invalid reorder indices: from {from} to {to} (collection has {len} items)")]
    InvalidRange { from: usize, to: usize, len: usize },

    /// Payload is well-formed JSON but has the wrong shape or field types
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Payload could not be parsed at all
    #[error("Failed to parse data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A prepared import was computed against an older state of the store
    #[error("Import is stale: store changed from revision {expected} to {actual} since it was prepared")]
    StaleImport { expected: u64, actual: u64 },
}

impl CoreError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
