//! In-process ID → root hints for the locator.
//!
//! The index is only ever a hint: every lookup through it is verified by
//! walking the fetched root, and a stale entry falls back to the scan. It is
//! maintained by the facade after each successful mutation and by the
//! locator after each successful scan.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{ID, document::RootDoc};

#[derive(Debug, Default)]
pub struct NodeIndex {
    roots: RwLock<HashMap<ID, ID>>,
}

impl NodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root last known to contain `node_id`.
    pub async fn hint(&self, node_id: &ID) -> Option<ID> {
        self.roots.read().await.get(node_id).cloned()
    }

    pub async fn record(&self, node_id: ID, root_id: ID) {
        self.roots.write().await.insert(node_id, root_id);
    }

    /// Records every node materialized in `root`.
    pub async fn record_root(&self, root: &RootDoc) {
        let mut roots = self.roots.write().await;
        for (node_id, _) in root.node_ids() {
            roots.insert(node_id, root.id.clone());
        }
    }

    pub async fn forget<I>(&self, node_ids: I)
    where
        I: IntoIterator<Item = ID>,
    {
        let mut roots = self.roots.write().await;
        for node_id in node_ids {
            roots.remove(&node_id);
        }
    }

    /// Drops every entry pointing at `root_id`.
    pub async fn forget_root(&self, root_id: &ID) {
        self.roots.write().await.retain(|_, root| root != root_id);
    }

    pub async fn len(&self) -> usize {
        self.roots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
