//! Error types for node lookup.

use thiserror::Error;

use crate::{ID, document::Level};

/// Errors that can occur while resolving a node to its owning root.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LocateError {
    /// No scanned root contains the node.
    ///
    /// When `scanned` equals the scan limit the node may still exist in a
    /// root outside the scanned set.
    #[error("{level} not found: {id} (scanned {scanned} roots)")]
    NodeNotFound { level: Level, id: ID, scanned: usize },

    /// The parent of a requested listing or insertion does not exist.
    #[error("Parent {level} not found: {id}")]
    ParentNotFound { level: Level, id: ID },

    /// The level cannot be addressed by a path inside a root.
    #[error("Cannot locate a {level} inside a root document")]
    InvalidTarget { level: Level },
}

impl LocateError {
    /// Check if this error indicates a node or parent was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LocateError::NodeNotFound { .. } | LocateError::ParentNotFound { .. }
        )
    }

    /// Get the level and ID of the missing node, if any.
    pub fn missing(&self) -> Option<(Level, &ID)> {
        match self {
            LocateError::NodeNotFound { level, id, .. }
            | LocateError::ParentNotFound { level, id } => Some((*level, id)),
            LocateError::InvalidTarget { .. } => None,
        }
    }
}

impl From<LocateError> for crate::Error {
    fn from(err: LocateError) -> Self {
        crate::Error::Locate(err)
    }
}
