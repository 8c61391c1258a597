//! Error types for the document store backends.
//!
//! This module defines structured error types for the `get` / `find` / `put`
//! boundary, so callers can tell an absent document from an unreachable store
//! or a rejected write.

use thiserror::Error;

use crate::ID;

/// Errors that can occur during document store operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// Root document not found by ID.
    #[error("Document not found: {id}")]
    DocumentNotFound {
        /// The ID of the root document that was not found
        id: ID,
    },

    /// A root document with this ID already exists.
    #[error("Document already exists: {id}")]
    DocumentExists {
        /// The ID that is already taken
        id: ID,
    },

    /// The store could not be reached for a read.
    #[error("Document store unavailable: {reason}")]
    Unavailable {
        /// Description of why the store is unavailable
        reason: String,
    },

    /// A write was rejected; the stored document is unchanged.
    #[error("Write to document {root_id} failed: {reason}")]
    WriteFailed {
        /// The root document the write targeted
        root_id: ID,
        /// Description of the failure
        reason: String,
    },

    /// The document changed since it was read.
    #[error("Document {root_id} is at revision {actual}, write expected {expected}")]
    RevisionConflict {
        /// The root document the write targeted
        root_id: ID,
        /// Revision the writer read
        expected: u64,
        /// Revision currently stored
        actual: u64,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl BackendError {
    /// Check if this error indicates a document was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::DocumentNotFound { .. })
    }

    /// Check if this error indicates the store could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BackendError::Unavailable { .. })
    }

    /// Check if this error is a rejected write.
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            BackendError::WriteFailed { .. } | BackendError::RevisionConflict { .. }
        )
    }

    /// Check if this error is an optimistic concurrency conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            BackendError::RevisionConflict { .. } | BackendError::DocumentExists { .. }
        )
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
        )
    }

    /// Get the root document ID if this error is about a specific document.
    pub fn root_id(&self) -> Option<&ID> {
        match self {
            BackendError::DocumentNotFound { id }
            | BackendError::DocumentExists { id }
            | BackendError::WriteFailed { root_id: id, .. }
            | BackendError::RevisionConflict { root_id: id, .. } => Some(id),
            _ => None,
        }
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
