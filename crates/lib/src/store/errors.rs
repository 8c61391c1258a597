//! Error types surfaced by the exhibit store facade.

use thiserror::Error;

use crate::{
    ID,
    backend::BackendError,
    document::Level,
    locator::LocateError,
    mutator::MutationError,
};

/// Errors returned to callers of [`crate::ExhibitStore`].
///
/// Lower-level lookup and edit failures are folded into these variants, so
/// callers only need to handle one taxonomy. Failures of the backing store
/// itself (for example an unavailable store during a read) pass through as
/// [`crate::Error::Backend`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// The node, or the parent of a listing or insertion, does not exist.
    ///
    /// A node owned by a root outside the locator's scan limit is also
    /// reported this way.
    #[error("{level} not found: {id}")]
    NotFound { level: Level, id: ID },

    /// Input was rejected before any write.
    #[error("Invalid {level} {field}: {reason}")]
    ValidationFailed {
        level: Level,
        field: String,
        reason: String,
    },

    /// The final write failed and nothing was persisted; re-fetch before
    /// retrying.
    #[error("Persisting collection {root_id} failed: {reason}")]
    PersistFailed { root_id: ID, reason: String },

    /// The collection changed between read and write (optimistic mode).
    #[error("Collection {root_id} changed concurrently: read revision {expected}, found {actual}")]
    Conflict {
        root_id: ID,
        expected: u64,
        actual: u64,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, StoreError::ValidationFailed { .. })
    }

    pub fn is_persist_failure(&self) -> bool {
        matches!(self, StoreError::PersistFailed { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }

    /// Get the collection ID if this error concerns a write to one.
    pub fn root_id(&self) -> Option<&ID> {
        match self {
            StoreError::PersistFailed { root_id, .. } | StoreError::Conflict { root_id, .. } => {
                Some(root_id)
            }
            _ => None,
        }
    }
}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}

/// Folds lookup and edit errors into the facade's taxonomy.
pub(crate) fn surface(err: crate::Error) -> crate::Error {
    match err {
        crate::Error::Locate(
            LocateError::NodeNotFound { level, id, .. } | LocateError::ParentNotFound { level, id },
        ) => StoreError::NotFound { level, id }.into(),
        crate::Error::Backend(BackendError::DocumentNotFound { id }) => StoreError::NotFound {
            level: Level::Collection,
            id,
        }
        .into(),
        crate::Error::Mutation(MutationError::ProtectedField { level, field }) => {
            StoreError::ValidationFailed {
                level,
                field,
                reason: "is managed by the store".to_string(),
            }
            .into()
        }
        crate::Error::Mutation(MutationError::OrderOverflow { level, max }) => {
            StoreError::ValidationFailed {
                level,
                field: "order".to_string(),
                reason: format!("no order follows {max}"),
            }
            .into()
        }
        crate::Error::Mutation(MutationError::MergeFailed { level, source }) => {
            StoreError::ValidationFailed {
                level,
                field: "patch".to_string(),
                reason: source.to_string(),
            }
            .into()
        }
        other => other,
    }
}
