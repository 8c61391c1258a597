//! Per-level CRUD handles.

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use super::{Cause, ExhibitStore, Listing, StoreError, surface};
use crate::{
    ID, Result,
    document::{Level, Node, NodePath, ParentPath, RootDoc},
    locator::{Located, ParentLocated},
    mapper::Mapper,
    mutator,
    view::Validate,
};

/// CRUD operations on one level of the hierarchy, obtained from
/// [`ExhibitStore::sections`], [`ExhibitStore::panels`],
/// [`ExhibitStore::blocks`] or [`ExhibitStore::waypoints`].
pub struct Nodes<'a, N> {
    store: &'a ExhibitStore,
    node: PhantomData<N>,
}

fn parent_level<N: Node>() -> Level {
    N::LEVEL.parent().unwrap_or(Level::Collection)
}

fn not_found<N: Node>(id: &ID) -> crate::Error {
    StoreError::NotFound {
        level: N::LEVEL,
        id: id.clone(),
    }
    .into()
}

fn invalid_order<N: Node>(reason: String) -> crate::Error {
    StoreError::ValidationFailed {
        level: N::LEVEL,
        field: "ordered_ids".to_string(),
        reason,
    }
    .into()
}

/// ID of the node owning the list that contains `path`.
fn owner_of<N: Node>(root: &RootDoc, path: &NodePath, id: &ID) -> Result<ID> {
    path.parent()
        .owner_id(root)
        .cloned()
        .ok_or_else(|| not_found::<N>(id))
}

fn sorted_views<N: Mapper>(root: &RootDoc, parent: &ParentPath, parent_id: &ID) -> Vec<N::View> {
    let mut nodes: Vec<&N> = N::siblings(root, parent)
        .map(|nodes| nodes.iter().collect())
        .unwrap_or_default();
    nodes.sort_by_key(|node| node.order());
    nodes.into_iter().map(|node| node.to_view(parent_id)).collect()
}

impl<'a, N: Mapper> Nodes<'a, N> {
    pub(crate) fn new(store: &'a ExhibitStore) -> Self {
        Self {
            store,
            node: PhantomData,
        }
    }

    /// Children of `parent_id` in display order.
    pub async fn list(&self, parent_id: &ID) -> Result<Vec<N::View>> {
        let ParentLocated { root, parent } = self
            .store
            .locator()
            .locate_by_parent(parent_id, parent_level::<N>(), N::LEVEL.depth())
            .await
            .map_err(surface)?;
        Ok(sorted_views::<N>(&root, &parent, parent_id))
    }

    pub async fn get(&self, id: &ID) -> Result<N::View> {
        let Located { root, path } = self
            .store
            .locator()
            .locate(id, N::LEVEL)
            .await
            .map_err(surface)?;
        let parent_id = owner_of::<N>(&root, &path, id)?;
        N::at(&root, &path)
            .map(|node| node.to_view(&parent_id))
            .ok_or_else(|| not_found::<N>(id))
    }

    /// Appends a new child to `parent_id` with the next free order.
    pub async fn create(&self, parent_id: &ID, input: N::New) -> Result<N::View> {
        input.validate()?;
        let ParentLocated { root, parent } = self
            .store
            .locator()
            .locate_by_parent(parent_id, parent_level::<N>(), N::ROOT_FIELD.write_depth())
            .await
            .map_err(surface)?;
        let root_id = root.id.clone();

        let (root, node) =
            mutator::insert(root, &parent, N::new_to_storage(&input)).map_err(surface)?;
        let listings = Listing::around(N::LEVEL, parent_id, node.id());
        self.store
            .persist(root, N::ROOT_FIELD, Cause::Created, &listings)
            .await?;
        self.store.remember(node.id(), &root_id).await;

        tracing::debug!(
            kind = %N::LEVEL,
            node_id = %node.id(),
            root_id = %root_id,
            order = node.order(),
            "Created node"
        );
        Ok(node.to_view(parent_id))
    }

    /// Merges the supplied fields into a node; omitted fields are untouched.
    pub async fn update(&self, id: &ID, patch: N::Patch) -> Result<N::View> {
        patch.validate()?;
        let fields = N::patch_to_storage(&patch);
        let Located { root, path } = self
            .store
            .locator()
            .locate_at(id, N::LEVEL, N::ROOT_FIELD.write_depth())
            .await
            .map_err(surface)?;
        let parent_id = owner_of::<N>(&root, &path, id)?;

        let (root, node) = mutator::update::<N>(root, &path, &fields).map_err(surface)?;
        let listings = Listing::around(N::LEVEL, &parent_id, id);
        self.store
            .persist(root, N::ROOT_FIELD, Cause::Updated, &listings)
            .await?;

        tracing::debug!(kind = %N::LEVEL, node_id = %id, "Updated node");
        Ok(node.to_view(&parent_id))
    }

    /// Deletes a node together with everything nested inside it.
    pub async fn delete(&self, id: &ID) -> Result<()> {
        let Located { root, path } = self
            .store
            .locator()
            .locate_at(id, N::LEVEL, N::ROOT_FIELD.write_depth())
            .await
            .map_err(surface)?;
        let parent_id = owner_of::<N>(&root, &path, id)?;

        let (root, removed) = mutator::delete::<N>(root, &path).map_err(surface)?;
        let listings = Listing::around(N::LEVEL, &parent_id, id);
        self.store
            .persist(root, N::ROOT_FIELD, Cause::Deleted, &listings)
            .await?;

        let mut forgotten = removed.descendant_ids();
        tracing::debug!(
            kind = %N::LEVEL,
            node_id = %id,
            descendants = forgotten.len(),
            "Deleted node"
        );
        forgotten.push(removed.id().clone());
        self.store.forget(forgotten).await;
        Ok(())
    }

    /// Puts the listed children in the sequence supplied.
    ///
    /// The listed children share out the order values they already hold,
    /// smallest first, so children left out of `ordered_ids` keep their
    /// orders and no two siblings end up with the same one. Returns the full
    /// listing in its new order.
    pub async fn reorder(&self, parent_id: &ID, ordered_ids: &[ID]) -> Result<Vec<N::View>> {
        if ordered_ids.is_empty() {
            return Err(invalid_order::<N>("must list at least one child".to_string()));
        }
        let mut seen = HashSet::with_capacity(ordered_ids.len());
        if let Some(duplicate) = ordered_ids.iter().find(|id| !seen.insert(*id)) {
            return Err(invalid_order::<N>(format!("'{duplicate}' is listed twice")));
        }

        let ParentLocated { root, parent } = self
            .store
            .locator()
            .locate_by_parent(parent_id, parent_level::<N>(), N::ROOT_FIELD.write_depth())
            .await
            .map_err(surface)?;

        let siblings = N::siblings(&root, &parent)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if let Some(stranger) = ordered_ids
            .iter()
            .find(|id| !siblings.iter().any(|node| node.id() == *id))
        {
            return Err(invalid_order::<N>(format!(
                "'{stranger}' is not a {} of {parent_id}",
                N::LEVEL
            )));
        }

        let mut slots: Vec<u64> = siblings
            .iter()
            .filter(|node| ordered_ids.contains(node.id()))
            .map(Node::order)
            .collect();
        slots.sort_unstable();
        let orders: HashMap<ID, u64> = ordered_ids.iter().cloned().zip(slots).collect();
        let root = mutator::reorder::<N>(root, &parent, &orders).map_err(surface)?;
        let views = sorted_views::<N>(&root, &parent, parent_id);

        let listings = [Listing::children(N::LEVEL, parent_id.clone())];
        self.store
            .persist(root, N::ROOT_FIELD, Cause::Reordered, &listings)
            .await?;

        tracing::debug!(kind = %N::LEVEL, parent_id = %parent_id, count = ordered_ids.len(), "Reordered nodes");
        Ok(views)
    }
}
