//! Path-based edits of a root document.
//!
//! Every operation takes the root by value and returns the edited root, so a
//! failed edit never leaves a half-modified document in the caller's hands.
//! Nothing here performs I/O; the facade persists the result.

use std::collections::HashMap;
use std::fmt::Display;

use serde_json::{Map, Value};

use crate::{
    ID, Result, constants,
    document::{Node, NodePath, ParentPath, RootDoc},
};

mod errors;

pub use errors::MutationError;

/// The order a node appended to `siblings` receives.
///
/// Fails when the largest sibling order has no successor.
pub fn next_order<N: Node>(siblings: &[N]) -> std::result::Result<u64, MutationError> {
    match siblings.iter().map(Node::order).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or(MutationError::OrderOverflow { level: N::LEVEL, max }),
    }
}

fn out_of_bounds<N: Node>(path: impl Display) -> MutationError {
    MutationError::PathOutOfBounds {
        level: N::LEVEL,
        path: path.to_string(),
    }
}

fn siblings_mut<'a, N: Node>(
    root: &'a mut RootDoc,
    parent: &ParentPath,
) -> std::result::Result<&'a mut Vec<N>, MutationError> {
    N::siblings_mut(root, parent).ok_or_else(|| out_of_bounds::<N>(parent))
}

fn node_mut<'a, N: Node>(
    root: &'a mut RootDoc,
    path: &NodePath,
) -> std::result::Result<&'a mut N, MutationError> {
    if path.level() != N::LEVEL {
        return Err(out_of_bounds::<N>(path));
    }
    N::siblings_mut(root, &path.parent())
        .and_then(|siblings| siblings.get_mut(path.index()))
        .ok_or_else(|| out_of_bounds::<N>(path))
}

fn is_protected<N: Node>(key: &str) -> bool {
    key == constants::ID_KEY || key == N::ORDER_KEY || N::CHILDREN_KEY == Some(key)
}

/// Appends `node` to the list at `parent` with a fresh ID and the next order.
///
/// Returns the edited root and the node as inserted.
pub fn insert<N: Node>(mut root: RootDoc, parent: &ParentPath, mut node: N) -> Result<(RootDoc, N)> {
    let siblings = siblings_mut::<N>(&mut root, parent)?;
    node.set_id(ID::generate());
    node.set_order(next_order(siblings)?);
    siblings.push(node.clone());
    Ok((root, node))
}

/// Shallow-merges storage `fields` into the node at `path`.
///
/// Keys absent from `fields` are untouched and `null` values remove a key.
/// The ID, order key and child array cannot be changed this way.
pub fn update<N: Node>(
    mut root: RootDoc,
    path: &NodePath,
    fields: &Map<String, Value>,
) -> Result<(RootDoc, N)> {
    if let Some(field) = fields.keys().find(|key| is_protected::<N>(key)) {
        return Err(MutationError::ProtectedField {
            level: N::LEVEL,
            field: field.clone(),
        }
        .into());
    }

    let node = node_mut::<N>(&mut root, path)?;
    let merge_failed = |source| MutationError::MergeFailed {
        level: N::LEVEL,
        source,
    };
    let mut value = serde_json::to_value(&*node).map_err(merge_failed)?;
    if let Value::Object(object) = &mut value {
        for (key, field) in fields {
            if field.is_null() {
                object.remove(key);
            } else {
                object.insert(key.clone(), field.clone());
            }
        }
    }
    let merged: N = serde_json::from_value(value).map_err(merge_failed)?;
    *node = merged.clone();
    Ok((root, merged))
}

/// Removes the node at `path`, together with everything nested inside it.
pub fn delete<N: Node>(mut root: RootDoc, path: &NodePath) -> Result<(RootDoc, N)> {
    if path.level() != N::LEVEL {
        return Err(out_of_bounds::<N>(path).into());
    }
    let siblings = siblings_mut::<N>(&mut root, &path.parent())?;
    if path.index() >= siblings.len() {
        return Err(out_of_bounds::<N>(path).into());
    }
    let removed = siblings.remove(path.index());
    Ok((root, removed))
}

/// Applies new orders to the children of `parent` and sorts the list.
///
/// Children missing from `orders` keep their current order. The sort is
/// stable, so children with equal orders keep their relative position.
pub fn reorder<N: Node>(
    mut root: RootDoc,
    parent: &ParentPath,
    orders: &HashMap<ID, u64>,
) -> Result<RootDoc> {
    let siblings = siblings_mut::<N>(&mut root, parent)?;
    for node in siblings.iter_mut() {
        if let Some(order) = orders.get(node.id()) {
            node.set_order(*order);
        }
    }
    siblings.sort_by_key(Node::order);
    Ok(root)
}
