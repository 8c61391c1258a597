//!
//! Vitrine: a hierarchical content store for exhibits.
//! This library presents record-style CRUD over trees that are persisted as a single document each.
//!
//! ## Core Concepts
//!
//! * **Collections (`document::RootDoc`)**: The root of an exhibit and the only unit of persistence. A Collection embeds its ordered Sections, each Section its ordered Panels, each Panel its ordered content Blocks, and alongside the Sections an ordered list of Waypoints.
//! * **Document stores (`backend::DocumentStore`)**: A pluggable storage layer that can only read (`get`, `find`) and overwrite top-level fields of (`put`) whole root documents.
//! * **Mapper (`mapper::Mapper`)**: Pure translation between the persisted shape of each level and the view models (`view`) exposed to callers, supplying the parent reference the storage lacks.
//! * **Locator (`locator::Locator`)**: Finds the Collection owning a node known only by its ID by scanning a bounded number of root documents, optionally short-cut by an in-process node index (`index::NodeIndex`).
//! * **Mutator (`mutator`)**: Pure path-based insert, merge, remove and reorder on an in-memory root document.
//! * **Facade (`store::ExhibitStore`)**: Per-level list/create/update/delete/reorder composed from the pieces above, broadcasting an invalidation event for every listing a write touches.
//!
//! Every node edit reads the owning Collection, edits it in memory and writes
//! back one top-level array. In the default last-write-wins mode two
//! concurrent edits of the same Collection race and the later write wins; the
//! optimistic mode (`store::ConcurrencyMode::Optimistic`) turns that into a
//! `store::StoreError::Conflict`.

pub mod backend;
pub mod clock;
pub mod constants;
pub mod document;
pub mod id;
pub mod index;
pub mod locator;
pub mod mapper;
pub mod mutator;
pub mod store;
pub mod view;

#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use clock::{Clock, SystemClock};
pub use id::ID;
/// Re-export the facade for easier access.
pub use store::ExhibitStore;

/// Result type used throughout the Vitrine library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Vitrine library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured document store errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured lookup errors from the locator module
    #[error(transparent)]
    Locate(locator::LocateError),

    /// Structured tree edit errors from the mutator module
    #[error(transparent)]
    Mutation(mutator::MutationError),

    /// Structured input conversion errors from the mapper module
    #[error(transparent)]
    Mapping(mapper::MappingError),

    /// Structured facade errors from the store module
    #[error(transparent)]
    Store(store::StoreError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::Locate(_) => "locator",
            Error::Mutation(_) => "mutator",
            Error::Mapping(_) => "mapper",
            Error::Store(_) => "store",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_not_found(),
            Error::Locate(locate_err) => locate_err.is_not_found(),
            Error::Mutation(mutation_err) => mutation_err.is_not_found(),
            Error::Store(store_err) => store_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error was raised for invalid caller input.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_validation_error(),
            Error::Mutation(mutation_err) => mutation_err.is_validation_error(),
            Error::Mapping(mapping_err) => mapping_err.is_input_error(),
            _ => false,
        }
    }

    /// Check if this error indicates a write was rejected and nothing was
    /// persisted.
    pub fn is_persist_failure(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_write_failure(),
            Error::Store(store_err) => store_err.is_persist_failure() || store_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (concurrent change or already
    /// exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_conflict(),
            Error::Store(store_err) => store_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error indicates the document store could not be reached.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_unavailable(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_io_error(),
            _ => false,
        }
    }
}
