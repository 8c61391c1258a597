//! Resolution of node IDs to their owning root document and index path.
//!
//! The backing store has no parent index, so a node known only by its ID is
//! found by scanning up to `scan_limit` root documents and walking each one.
//! A node owned by a root outside the scanned set is reported as not found;
//! callers cannot distinguish that from a node that never existed.
//!
//! When a [`NodeIndex`] is attached, its hint is tried first and verified by
//! walking the hinted root; a stale hint falls back to the scan.

use crate::{
    ID, Result,
    backend::{BackendError, DocumentStore, Filter},
    document::{Depth, Level, NodePath, ParentPath, RootDoc},
    index::NodeIndex,
};

mod errors;

pub use errors::LocateError;

/// A node resolved to its root and path.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub root: RootDoc,
    pub path: NodePath,
}

/// A parent resolved to its root and the path of the list it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentLocated {
    pub root: RootDoc,
    pub parent: ParentPath,
}

/// Finds nodes by ID across the root documents of one store.
pub struct Locator<'a> {
    backend: &'a dyn DocumentStore,
    scan_limit: usize,
    index: Option<&'a NodeIndex>,
}

impl<'a> Locator<'a> {
    pub fn new(backend: &'a dyn DocumentStore, scan_limit: usize) -> Self {
        Self {
            backend,
            scan_limit,
            index: None,
        }
    }

    /// Consults `index` before scanning and records scan results in it.
    pub fn with_index(mut self, index: &'a NodeIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Locates a node, materializing roots just deep enough to reach it.
    pub async fn locate(&self, id: &ID, level: Level) -> Result<Located> {
        self.locate_at(id, level, level.depth()).await
    }

    /// Locates a node, materializing the returned root at least to `depth`.
    pub async fn locate_at(&self, id: &ID, level: Level, depth: Depth) -> Result<Located> {
        if level == Level::Collection {
            return Err(LocateError::InvalidTarget { level }.into());
        }
        let depth = depth.max(level.depth());

        if let Some(located) = self.locate_hinted(id, level, depth).await? {
            return Ok(located);
        }

        let roots = self
            .backend
            .find(&Filter::All, depth, self.scan_limit)
            .await?;
        let scanned = roots.len();
        for root in roots {
            if let Some(path) = find_path(&root, id, level) {
                tracing::debug!(
                    node_id = %id,
                    root_id = %root.id,
                    path = %path,
                    scanned,
                    "Located node by scan"
                );
                if let Some(index) = self.index {
                    index.record(id.clone(), root.id.clone()).await;
                }
                return Ok(Located { root, path });
            }
        }

        if scanned >= self.scan_limit {
            tracing::debug!(
                node_id = %id,
                %level,
                scan_limit = self.scan_limit,
                "Node not found within scan limit"
            );
        }
        Err(LocateError::NodeNotFound {
            level,
            id: id.clone(),
            scanned,
        }
        .into())
    }

    /// Tries the index hint for `id`, forgetting it if the hinted root no
    /// longer holds the node.
    async fn locate_hinted(&self, id: &ID, level: Level, depth: Depth) -> Result<Option<Located>> {
        let Some(index) = self.index else {
            return Ok(None);
        };
        let Some(root_id) = index.hint(id).await else {
            return Ok(None);
        };

        match self.backend.get(&root_id, depth).await {
            Ok(root) => {
                if let Some(path) = find_path(&root, id, level) {
                    tracing::debug!(node_id = %id, root_id = %root_id, path = %path, "Located node by index");
                    return Ok(Some(Located { root, path }));
                }
            }
            Err(crate::Error::Backend(BackendError::DocumentNotFound { .. })) => {}
            Err(e) => return Err(e),
        }

        tracing::warn!(node_id = %id, root_id = %root_id, "Stale index hint, falling back to scan");
        index.forget([id.clone()]).await;
        Ok(None)
    }

    /// Resolves the list owned by `parent_id`.
    ///
    /// A Collection parent is fetched directly; any other parent is located
    /// first. Either way the root is materialized at least to `depth`.
    pub async fn locate_by_parent(
        &self,
        parent_id: &ID,
        parent_level: Level,
        depth: Depth,
    ) -> Result<ParentLocated> {
        if parent_level == Level::Collection {
            return match self.backend.get(parent_id, depth).await {
                Ok(root) => Ok(ParentLocated {
                    root,
                    parent: ParentPath::Collection,
                }),
                Err(crate::Error::Backend(BackendError::DocumentNotFound { .. })) => {
                    Err(LocateError::ParentNotFound {
                        level: parent_level,
                        id: parent_id.clone(),
                    }
                    .into())
                }
                Err(e) => Err(e),
            };
        }

        let located = match self.locate_at(parent_id, parent_level, depth).await {
            Ok(located) => located,
            Err(crate::Error::Locate(LocateError::NodeNotFound { .. })) => {
                return Err(LocateError::ParentNotFound {
                    level: parent_level,
                    id: parent_id.clone(),
                }
                .into());
            }
            Err(e) => return Err(e),
        };
        let parent = located
            .path
            .as_parent()
            .ok_or(LocateError::InvalidTarget {
                level: parent_level,
            })?;
        Ok(ParentLocated {
            root: located.root,
            parent,
        })
    }
}

/// Walks `root` for a node of `level` with the given ID.
///
/// Only materialized arrays are searched.
pub fn find_path(root: &RootDoc, id: &ID, level: Level) -> Option<NodePath> {
    let sections = || root.sections.iter().flatten().enumerate();
    match level {
        Level::Collection => None,
        Level::Waypoint => root
            .waypoints
            .as_ref()?
            .iter()
            .position(|waypoint| &waypoint.id == id)
            .map(|waypoint| NodePath::Waypoint { waypoint }),
        Level::Section => sections()
            .find(|(_, section)| &section.id == id)
            .map(|(section, _)| NodePath::Section { section }),
        Level::Panel => sections().find_map(|(section, s)| {
            s.panels
                .iter()
                .flatten()
                .position(|panel| &panel.id == id)
                .map(|panel| NodePath::Panel { section, panel })
        }),
        Level::Block => sections().find_map(|(section, s)| {
            s.panels
                .iter()
                .flatten()
                .enumerate()
                .find_map(|(panel, p)| {
                    p.blocks
                        .iter()
                        .flatten()
                        .position(|block| &block.id == id)
                        .map(|block| NodePath::Block {
                            section,
                            panel,
                            block,
                        })
                })
        }),
    }
}
