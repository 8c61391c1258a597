//! Error types for in-memory tree edits.

use thiserror::Error;

use crate::document::Level;

/// Errors that can occur while editing a root document in memory.
///
/// None of these leave a partially edited document behind: the mutator
/// consumes its input and only returns the edited copy on success.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MutationError {
    /// The path does not address an element of the document.
    #[error("No {level} at {path}")]
    PathOutOfBounds { level: Level, path: String },

    /// An update tried to change a field owned by the store.
    #[error("Field '{field}' of a {level} cannot be updated")]
    ProtectedField { level: Level, field: String },

    /// The siblings already hold the largest representable order.
    #[error("No {level} order follows {max}")]
    OrderOverflow { level: Level, max: u64 },

    /// Merged fields no longer form a valid node.
    #[error("Merged {level} fields are invalid: {source}")]
    MergeFailed {
        level: Level,
        #[source]
        source: serde_json::Error,
    },
}

impl MutationError {
    /// Check if this error was caused by the supplied fields rather than the
    /// document.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            MutationError::ProtectedField { .. }
                | MutationError::MergeFailed { .. }
                | MutationError::OrderOverflow { .. }
        )
    }

    /// Check if this error indicates the target path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MutationError::PathOutOfBounds { .. })
    }

    /// Get the level of the node the edit targeted.
    pub fn level(&self) -> Level {
        match self {
            MutationError::PathOutOfBounds { level, .. }
            | MutationError::ProtectedField { level, .. }
            | MutationError::MergeFailed { level, .. }
            | MutationError::OrderOverflow { level, .. } => *level,
        }
    }
}

impl From<MutationError> for crate::Error {
    fn from(err: MutationError) -> Self {
        crate::Error::Mutation(err)
    }
}
