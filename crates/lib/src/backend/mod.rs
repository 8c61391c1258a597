//! Backend implementations for Vitrine storage
//!
//! This module provides the core `DocumentStore` trait and the backends that
//! implement it.
//!
//! The backing store only understands whole root documents: it can read one
//! (`get`), scan many (`find`) and overwrite top-level fields of one (`put`).
//! It has no notion of Sections, Panels or Blocks as addressable records;
//! everything nested is handled above this layer by the locator and mutator.

use std::any::Any;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{
    ID, Result,
    document::{Depth, RootDoc, RootField, StoredSection, StoredWaypoint},
};

pub mod database;
mod errors;

pub use errors::BackendError;

/// Predicate selecting root documents in a `find` call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every root document.
    #[default]
    All,
    /// Root documents with one of the given IDs.
    Ids(Vec<ID>),
    /// Root documents whose name contains the text, case-insensitively.
    NameContains(String),
}

impl Filter {
    /// Returns true if the document satisfies this filter.
    pub fn matches(&self, doc: &RootDoc) -> bool {
        match self {
            Filter::All => true,
            Filter::Ids(ids) => ids.contains(&doc.id),
            Filter::NameContains(text) => doc.name.to_lowercase().contains(&text.to_lowercase()),
        }
    }
}

/// The subset of a root document's top-level fields replaced by a `put`.
///
/// Each present field replaces the stored value wholesale; a `sections` patch
/// rewrites the whole tree under every Section. Absent fields are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub sections: Option<Vec<StoredSection>>,
    pub waypoints: Option<Vec<StoredWaypoint>>,
    /// Extra top-level keys to set; a `null` value removes the key.
    pub extra: Map<String, Value>,
    /// When set, the write is rejected unless the stored revision matches.
    pub expected_revision: Option<u64>,
}

impl RootPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a patch carrying one top-level array taken from `root`.
    pub fn from_root(root: RootDoc, field: RootField) -> Self {
        let mut patch = Self::new();
        match field {
            RootField::Sections => patch.sections = Some(root.sections.unwrap_or_default()),
            RootField::Waypoints => patch.waypoints = Some(root.waypoints.unwrap_or_default()),
        }
        patch
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Guards the write with the revision the caller read.
    pub fn expecting_revision(mut self, revision: u64) -> Self {
        self.expected_revision = Some(revision);
        self
    }

    /// Returns true if the patch would not change any field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.sections.is_none()
            && self.waypoints.is_none()
            && self.extra.is_empty()
    }

    /// Applies the patch to a full document in place.
    pub(crate) fn apply(self, doc: &mut RootDoc) {
        if let Some(name) = self.name {
            doc.name = name;
        }
        if let Some(description) = self.description {
            doc.description = description;
        }
        if let Some(sections) = self.sections {
            doc.sections = Some(sections);
        }
        if let Some(waypoints) = self.waypoints {
            doc.waypoints = Some(waypoints);
        }
        for (key, value) in self.extra {
            if value.is_null() {
                doc.extra.remove(&key);
            } else {
                doc.extra.insert(key, value);
            }
        }
    }
}

/// DocumentStore trait abstracting the backing store of root documents.
///
/// Implementations persist each Collection as one document and must make
/// every `put` all-or-nothing: a failed write leaves the stored document
/// exactly as it was.
///
/// All implementations must be `Send` and `Sync` to allow sharing across
/// tasks, and implement `Any` to allow for downcasting if needed.
#[async_trait]
pub trait DocumentStore: Send + Sync + Any {
    /// Retrieves a root document materialized down to `depth`.
    ///
    /// # Errors
    /// `BackendError::DocumentNotFound` if no document has this ID,
    /// `BackendError::Unavailable` if the store cannot be read.
    async fn get(&self, root_id: &ID, depth: Depth) -> Result<RootDoc>;

    /// Returns up to `limit` root documents matching `filter`, each
    /// materialized down to `depth`, in creation order.
    async fn find(&self, filter: &Filter, depth: Depth, limit: usize) -> Result<Vec<RootDoc>>;

    /// Replaces the fields present in `patch` and returns the full document.
    ///
    /// Every successful write increments the document's revision.
    ///
    /// # Errors
    /// `BackendError::WriteFailed` or `BackendError::RevisionConflict`; in
    /// both cases nothing was written.
    async fn put(&self, root_id: &ID, patch: RootPatch) -> Result<RootDoc>;

    /// Stores a new root document, stamping its timestamps.
    async fn create(&self, root: RootDoc) -> Result<RootDoc>;

    /// Removes a root document and everything nested inside it.
    async fn remove(&self, root_id: &ID) -> Result<()>;

    /// IDs of all root documents in creation order.
    async fn all_roots(&self) -> Result<Vec<ID>>;

    /// Returns a reference to the store as a trait object for downcasting.
    fn as_any(&self) -> &dyn Any;
}
