//! The exhibit store facade.
//!
//! [`ExhibitStore`] is the only surface consumers use. Each write follows the
//! same cycle: validate input, resolve the owning Collection, edit it in
//! memory, write back the one top-level array that changed, then broadcast
//! [`Invalidation`] events for the listings the edit touched.
//!
//! Nothing is retried. When the final write fails the caller gets
//! [`StoreError::PersistFailed`] and must re-fetch before trying again.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{
    ID, Result,
    backend::{BackendError, DocumentStore, Filter, RootPatch},
    document::{
        Depth, Level, RootDoc, RootField, StoredBlock, StoredPanel, StoredSection,
        StoredWaypoint,
    },
    index::NodeIndex,
    locator::Locator,
    mapper,
    view::{CollectionPatch, CollectionTree, CollectionView, NewCollection, Validate},
};

mod config;
mod errors;
mod invalidation;
mod nodes;

pub use config::{ConcurrencyMode, StoreConfig};
pub use errors::StoreError;
pub(crate) use errors::surface;
pub use invalidation::{Cause, Invalidation, Listing};
pub use nodes::Nodes;

struct Inner {
    backend: Arc<dyn DocumentStore>,
    config: StoreConfig,
    index: Option<NodeIndex>,
    events: broadcast::Sender<Invalidation>,
}

/// CRUD over every level of the exhibit hierarchy.
///
/// Cheap to clone; clones share the backend, the node index and the
/// invalidation channel.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vitrine::{ExhibitStore, backend::database::InMemory};
/// use vitrine::view::{NewCollection, NewSection};
///
/// # #[tokio::main]
/// # async fn main() -> vitrine::Result<()> {
/// let store = ExhibitStore::new(Arc::new(InMemory::new()));
/// let collection = store.create_collection(NewCollection::new("Memory")).await?;
/// let section = store
///     .sections()
///     .create(&collection.id, NewSection::new("Arrival"))
///     .await?;
/// assert_eq!(section.order, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ExhibitStore {
    inner: Arc<Inner>,
}

impl ExhibitStore {
    /// Creates a facade over `backend` with the default configuration.
    pub fn new(backend: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    pub fn with_config(backend: Arc<dyn DocumentStore>, config: StoreConfig) -> Self {
        let (events, _) = broadcast::channel(config.invalidation_capacity.max(1));
        let index = config.node_index.then(NodeIndex::new);
        Self {
            inner: Arc::new(Inner {
                backend,
                config,
                index,
                events,
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    pub fn backend(&self) -> &Arc<dyn DocumentStore> {
        &self.inner.backend
    }

    /// The node index, when enabled in the configuration.
    pub fn node_index(&self) -> Option<&NodeIndex> {
        self.inner.index.as_ref()
    }

    /// Receives an [`Invalidation`] for every listing a later write touches.
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.inner.events.subscribe()
    }

    pub fn sections(&self) -> Nodes<'_, StoredSection> {
        Nodes::new(self)
    }

    pub fn panels(&self) -> Nodes<'_, StoredPanel> {
        Nodes::new(self)
    }

    pub fn blocks(&self) -> Nodes<'_, StoredBlock> {
        Nodes::new(self)
    }

    pub fn waypoints(&self) -> Nodes<'_, StoredWaypoint> {
        Nodes::new(self)
    }

    // ===== Collections =====

    pub async fn create_collection(&self, input: NewCollection) -> Result<CollectionView> {
        input.validate()?;
        let root = mapper::new_collection_to_storage(&input, ID::generate());
        let created = self.inner.backend.create(root).await.map_err(surface)?;
        tracing::info!(root_id = %created.id, name = %created.name, "Created collection");
        self.invalidate(&[Listing::collections()], Cause::Created);
        Ok(mapper::collection_to_view(&created))
    }

    pub async fn get_collection(&self, id: &ID) -> Result<CollectionView> {
        let root = self
            .inner
            .backend
            .get(id, Depth::ROOT)
            .await
            .map_err(surface)?;
        Ok(mapper::collection_to_view(&root))
    }

    /// Collections matching `filter`, in creation order.
    pub async fn list_collections(&self, filter: &Filter) -> Result<Vec<CollectionView>> {
        let roots = self
            .inner
            .backend
            .find(filter, Depth::ROOT, usize::MAX)
            .await?;
        Ok(roots.iter().map(mapper::collection_to_view).collect())
    }

    pub async fn update_collection(&self, id: &ID, patch: CollectionPatch) -> Result<CollectionView> {
        patch.validate()?;
        let current = self
            .inner
            .backend
            .get(id, Depth::ROOT)
            .await
            .map_err(surface)?;
        let mut root_patch = mapper::collection_patch_to_storage(&patch);
        if self.inner.config.concurrency == ConcurrencyMode::Optimistic {
            root_patch = root_patch.expecting_revision(current.revision);
        }
        let listings = [Listing::collections()];
        let written = self.write(id, root_patch, Cause::Updated, &listings).await?;
        Ok(mapper::collection_to_view(&written))
    }

    /// Deletes a Collection and everything nested inside it.
    pub async fn delete_collection(&self, id: &ID) -> Result<()> {
        self.inner.backend.remove(id).await.map_err(surface)?;
        if let Some(index) = &self.inner.index {
            index.forget_root(id).await;
        }
        tracing::info!(root_id = %id, "Deleted collection");
        let mut listings = vec![Listing::collections()];
        listings.extend(
            Level::Collection
                .children()
                .iter()
                .map(|level| Listing::children(*level, id.clone())),
        );
        self.invalidate(&listings, Cause::Deleted);
        Ok(())
    }

    /// The whole Collection as nested views, every list in display order.
    pub async fn tree(&self, id: &ID) -> Result<CollectionTree> {
        let root = self
            .inner
            .backend
            .get(id, Depth::FULL)
            .await
            .map_err(surface)?;
        if let Some(index) = &self.inner.index {
            index.record_root(&root).await;
        }
        Ok(mapper::tree_to_view(&root))
    }

    // ===== Shared plumbing =====

    pub(crate) fn locator(&self) -> Locator<'_> {
        let locator = Locator::new(self.inner.backend.as_ref(), self.inner.config.scan_limit);
        match &self.inner.index {
            Some(index) => locator.with_index(index),
            None => locator,
        }
    }

    /// Writes `field` of an edited root back, guarded by the revision it was
    /// read at when running in optimistic mode.
    pub(crate) async fn persist(
        &self,
        root: RootDoc,
        field: RootField,
        cause: Cause,
        listings: &[Listing],
    ) -> Result<RootDoc> {
        let root_id = root.id.clone();
        let read_revision = root.revision;
        let mut patch = RootPatch::from_root(root, field);
        if self.inner.config.concurrency == ConcurrencyMode::Optimistic {
            patch = patch.expecting_revision(read_revision);
        }
        self.write(&root_id, patch, cause, listings).await
    }

    async fn write(
        &self,
        root_id: &ID,
        patch: RootPatch,
        cause: Cause,
        listings: &[Listing],
    ) -> Result<RootDoc> {
        match self.inner.backend.put(root_id, patch).await {
            Ok(written) => {
                tracing::debug!(root_id = %root_id, revision = written.revision, ?cause, "Persisted collection");
                self.invalidate(listings, cause);
                Ok(written)
            }
            Err(crate::Error::Backend(BackendError::RevisionConflict {
                root_id,
                expected,
                actual,
            })) => {
                tracing::warn!(root_id = %root_id, expected, actual, "Collection changed concurrently");
                self.invalidate(listings, Cause::PersistFailed);
                Err(StoreError::Conflict {
                    root_id,
                    expected,
                    actual,
                }
                .into())
            }
            Err(crate::Error::Backend(err)) if err.is_write_failure() || err.is_unavailable() => {
                tracing::warn!(root_id = %root_id, error = %err, "Failed to persist collection");
                self.invalidate(listings, Cause::PersistFailed);
                Err(StoreError::PersistFailed {
                    root_id: root_id.clone(),
                    reason: err.to_string(),
                }
                .into())
            }
            Err(err) => Err(surface(err)),
        }
    }

    pub(crate) async fn remember(&self, node_id: &ID, root_id: &ID) {
        if let Some(index) = &self.inner.index {
            index.record(node_id.clone(), root_id.clone()).await;
        }
    }

    pub(crate) async fn forget(&self, node_ids: Vec<ID>) {
        if let Some(index) = &self.inner.index {
            index.forget(node_ids).await;
        }
    }

    fn invalidate(&self, listings: &[Listing], cause: Cause) {
        for listing in listings {
            let event = Invalidation {
                listing: listing.clone(),
                cause,
            };
            if self.inner.events.send(event).is_err() {
                // No subscribers.
                break;
            }
        }
    }
}

impl std::fmt::Debug for ExhibitStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExhibitStore")
            .field("config", &self.inner.config)
            .field("index", &self.inner.index.is_some())
            .finish_non_exhaustive()
    }
}
