//! Error types for converting caller input into view models.

use thiserror::Error;

use crate::document::Level;

/// Errors raised while interpreting untyped input as a level's model.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MappingError {
    /// JSON input did not match the creation or update model of a level.
    #[error("Invalid {level} input: {source}")]
    InvalidInput {
        level: Level,
        #[source]
        source: serde_json::Error,
    },

    /// The operation is not available at this level.
    #[error("{operation} is not supported for {level}")]
    UnsupportedLevel { level: Level, operation: String },
}

impl MappingError {
    /// Check if this error was caused by malformed caller input.
    pub fn is_input_error(&self) -> bool {
        matches!(self, MappingError::InvalidInput { .. })
    }

    /// Get the level the failed input was meant for.
    pub fn level(&self) -> Level {
        match self {
            MappingError::InvalidInput { level, .. }
            | MappingError::UnsupportedLevel { level, .. } => *level,
        }
    }
}

impl From<MappingError> for crate::Error {
    fn from(err: MappingError) -> Self {
        crate::Error::Mapping(err)
    }
}
