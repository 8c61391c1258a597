//! Notifications that cached listings are stale.

use serde::Serialize;

use crate::{ID, document::Level};

/// One list of nodes a caller may have cached.
///
/// `parent_id` is `None` only for the list of Collections itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Listing {
    pub level: Level,
    pub parent_id: Option<ID>,
}

impl Listing {
    /// The `level` children of `parent_id`.
    pub fn children(level: Level, parent_id: ID) -> Self {
        Self {
            level,
            parent_id: Some(parent_id),
        }
    }

    /// The list of all Collections.
    pub fn collections() -> Self {
        Self {
            level: Level::Collection,
            parent_id: None,
        }
    }

    /// The listing containing a node of `level` under `parent_id`, followed by
    /// every listing the node itself owns.
    pub(crate) fn around(level: Level, parent_id: &ID, node_id: &ID) -> Vec<Listing> {
        let mut listings = vec![Listing::children(level, parent_id.clone())];
        listings.extend(
            level
                .children()
                .iter()
                .map(|child| Listing::children(*child, node_id.clone())),
        );
        listings
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    Created,
    Updated,
    Deleted,
    Reordered,
    /// A write failed; what callers cached before it may not match storage.
    PersistFailed,
}

/// Broadcast after every facade write attempt that may have left cached
/// listings stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invalidation {
    pub listing: Listing,
    pub cause: Cause,
}
