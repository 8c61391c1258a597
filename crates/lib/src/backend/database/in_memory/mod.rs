//! In-memory document store implementation
//!
//! This module provides an in-memory implementation of the `DocumentStore`
//! trait, suitable for testing, development, or small deployments that
//! persist by saving the whole state to a JSON file.

mod persistence;
mod storage;

use std::any::Any;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
#[cfg(any(test, feature = "testing"))]
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Clock, ID, Result, SystemClock,
    backend::{DocumentStore, Filter, RootPatch},
    document::{Depth, RootDoc},
};

/// Root documents keyed by ID, plus the order they were created in.
#[derive(Debug, Clone, Default)]
pub(crate) struct Documents {
    pub(crate) by_id: HashMap<ID, RootDoc>,
    pub(crate) order: Vec<ID>,
}

/// A simple in-memory document store using a `HashMap` for storage.
///
/// Documents are kept at full depth and truncated on the way out, so a `get`
/// at a shallow depth never loses data on a later `put`. Every write swaps a
/// whole document under one lock, so readers never observe a partial write.
///
/// Persistence is available via `save_to_file` and `load_from_file`,
/// serializing all documents to JSON.
#[derive(Debug)]
pub struct InMemory {
    pub(crate) documents: RwLock<Documents>,
    pub(crate) clock: Arc<dyn Clock>,
    /// Reads report `Unavailable` and writes fail while this is false.
    pub(crate) available: AtomicBool,
    #[cfg(any(test, feature = "testing"))]
    pub(crate) failing_puts: AtomicUsize,
}

impl InMemory {
    /// Creates a new, empty `InMemory` store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a new, empty store stamping documents with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            documents: RwLock::new(Documents::default()),
            clock,
            available: AtomicBool::new(true),
            #[cfg(any(test, feature = "testing"))]
            failing_puts: AtomicUsize::new(0),
        }
    }

    /// Number of root documents currently stored.
    pub async fn len(&self) -> usize {
        self.documents.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Saves every root document to a specified file as JSON.
    ///
    /// # Arguments
    /// * `path` - The path to the file where the state should be saved.
    ///
    /// # Returns
    /// A `Result` indicating success or an I/O or serialization error.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path).await
    }

    /// Loads the store state from a specified JSON file.
    ///
    /// If the file does not exist, a new, empty `InMemory` store is returned.
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path, Arc::new(SystemClock)).await
    }

    /// Like [`InMemory::load_from_file`], stamping later writes with `clock`.
    pub async fn load_from_file_with_clock<P: AsRef<Path>>(
        path: P,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        persistence::load_from_file(path, clock).await
    }

    pub(crate) fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Simulates the store going offline (`false`) or coming back (`true`).
    #[cfg(any(test, feature = "testing"))]
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Makes the next `count` calls to `put` fail with `WriteFailed`.
    #[cfg(any(test, feature = "testing"))]
    pub fn fail_next_puts(&self, count: usize) {
        self.failing_puts.store(count, Ordering::SeqCst);
    }

    /// Consumes one injected put failure, if any are pending.
    #[cfg(any(test, feature = "testing"))]
    pub(crate) fn take_injected_failure(&self) -> bool {
        self.failing_puts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    #[cfg(not(any(test, feature = "testing")))]
    pub(crate) fn take_injected_failure(&self) -> bool {
        false
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemory {
    async fn get(&self, root_id: &ID, depth: Depth) -> Result<RootDoc> {
        storage::get(self, root_id, depth).await
    }

    async fn find(&self, filter: &Filter, depth: Depth, limit: usize) -> Result<Vec<RootDoc>> {
        storage::find(self, filter, depth, limit).await
    }

    async fn put(&self, root_id: &ID, patch: RootPatch) -> Result<RootDoc> {
        storage::put(self, root_id, patch).await
    }

    async fn create(&self, root: RootDoc) -> Result<RootDoc> {
        storage::create(self, root).await
    }

    async fn remove(&self, root_id: &ID) -> Result<()> {
        storage::remove(self, root_id).await
    }

    async fn all_roots(&self) -> Result<Vec<ID>> {
        storage::all_roots(self).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
