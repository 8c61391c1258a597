//! Core storage operations for the InMemory document store

use super::InMemory;
use crate::{
    ID, Result,
    backend::{BackendError, Filter, RootPatch},
    document::{Depth, RootDoc},
};

fn unavailable() -> crate::Error {
    BackendError::Unavailable {
        reason: "in-memory store is offline".to_string(),
    }
    .into()
}

/// Retrieves a root document by ID, truncated to `depth`.
pub(crate) async fn get(backend: &InMemory, root_id: &ID, depth: Depth) -> Result<RootDoc> {
    if !backend.is_available() {
        return Err(unavailable());
    }
    let documents = backend.documents.read().await;
    documents
        .by_id
        .get(root_id)
        .map(|doc| doc.truncated(depth))
        .ok_or_else(|| {
            BackendError::DocumentNotFound {
                id: root_id.clone(),
            }
            .into()
        })
}

/// Scans documents in creation order, returning at most `limit` matches.
pub(crate) async fn find(
    backend: &InMemory,
    filter: &Filter,
    depth: Depth,
    limit: usize,
) -> Result<Vec<RootDoc>> {
    if !backend.is_available() {
        return Err(unavailable());
    }
    let documents = backend.documents.read().await;
    let found: Vec<RootDoc> = documents
        .order
        .iter()
        .filter_map(|id| documents.by_id.get(id))
        .filter(|doc| filter.matches(doc))
        .take(limit)
        .map(|doc| doc.truncated(depth))
        .collect();
    tracing::trace!(
        ?filter,
        depth = %depth,
        limit,
        found = found.len(),
        "Scanned root documents"
    );
    Ok(found)
}

/// Replaces the patched fields of a stored document.
///
/// The new document is built on a copy and swapped in only after every check
/// passes, so a failed write leaves the stored document untouched.
pub(crate) async fn put(backend: &InMemory, root_id: &ID, patch: RootPatch) -> Result<RootDoc> {
    if !backend.is_available() || backend.take_injected_failure() {
        return Err(BackendError::WriteFailed {
            root_id: root_id.clone(),
            reason: "in-memory store rejected the write".to_string(),
        }
        .into());
    }

    let mut documents = backend.documents.write().await;
    let current = documents
        .by_id
        .get(root_id)
        .ok_or_else(|| BackendError::DocumentNotFound {
            id: root_id.clone(),
        })?;

    if let Some(expected) = patch.expected_revision
        && expected != current.revision
    {
        return Err(BackendError::RevisionConflict {
            root_id: root_id.clone(),
            expected,
            actual: current.revision,
        }
        .into());
    }

    let mut updated = current.clone();
    patch.apply(&mut updated);
    updated.revision = current.revision + 1;
    updated.updated_at = backend.clock.now_millis();

    documents.by_id.insert(root_id.clone(), updated.clone());
    tracing::debug!(root_id = %root_id, revision = updated.revision, "Wrote root document");
    Ok(updated)
}

/// Stores a new root document.
pub(crate) async fn create(backend: &InMemory, mut root: RootDoc) -> Result<RootDoc> {
    if !backend.is_available() {
        return Err(BackendError::WriteFailed {
            root_id: root.id.clone(),
            reason: "in-memory store is offline".to_string(),
        }
        .into());
    }

    let mut documents = backend.documents.write().await;
    if documents.by_id.contains_key(&root.id) {
        return Err(BackendError::DocumentExists { id: root.id }.into());
    }

    let now = backend.clock.now_millis();
    root.created_at = now;
    root.updated_at = now;
    root.revision = 0;
    root.sections.get_or_insert_with(Vec::new);
    root.waypoints.get_or_insert_with(Vec::new);

    documents.order.push(root.id.clone());
    documents.by_id.insert(root.id.clone(), root.clone());
    tracing::info!(root_id = %root.id, name = %root.name, "Created root document");
    Ok(root)
}

/// Removes a root document.
pub(crate) async fn remove(backend: &InMemory, root_id: &ID) -> Result<()> {
    if !backend.is_available() {
        return Err(BackendError::WriteFailed {
            root_id: root_id.clone(),
            reason: "in-memory store is offline".to_string(),
        }
        .into());
    }

    let mut documents = backend.documents.write().await;
    if documents.by_id.remove(root_id).is_none() {
        return Err(BackendError::DocumentNotFound {
            id: root_id.clone(),
        }
        .into());
    }
    documents.order.retain(|id| id != root_id);
    tracing::info!(root_id = %root_id, "Removed root document");
    Ok(())
}

/// IDs of all stored documents in creation order.
pub(crate) async fn all_roots(backend: &InMemory) -> Result<Vec<ID>> {
    if !backend.is_available() {
        return Err(unavailable());
    }
    Ok(backend.documents.read().await.order.clone())
}
