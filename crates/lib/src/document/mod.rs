//! Storage representation of exhibit trees.
//!
//! A Collection is persisted as a single [`RootDoc`] with every Section,
//! Panel, Block and Waypoint embedded inside it. The structs in this module
//! mirror the persisted field names exactly (camelCase, no parent
//! references); the [`crate::mapper`] module translates them into the view
//! models exposed to callers.
//!
//! Child arrays are `Option`s: `None` means the array was not materialized at
//! the [`Depth`] the document was fetched with, which is different from an
//! empty list.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ID;

mod nodes;
mod path;

pub use nodes::{Location, Node, StoredBlock, StoredPanel, StoredSection, StoredWaypoint};
pub use path::{NodePath, ParentPath};

/// The levels of the exhibit hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Collection,
    Section,
    Panel,
    Block,
    Waypoint,
}

impl Level {
    /// The shallowest fetch depth at which nodes of this level are materialized.
    pub fn depth(self) -> Depth {
        match self {
            Level::Collection => Depth::ROOT,
            Level::Section | Level::Waypoint => Depth::SECTIONS,
            Level::Panel => Depth::PANELS,
            Level::Block => Depth::FULL,
        }
    }

    /// The level of this level's parent, `None` for Collections.
    pub fn parent(self) -> Option<Level> {
        match self {
            Level::Collection => None,
            Level::Section | Level::Waypoint => Some(Level::Collection),
            Level::Panel => Some(Level::Section),
            Level::Block => Some(Level::Panel),
        }
    }

    /// The levels whose lists a node of this level owns.
    pub fn children(self) -> &'static [Level] {
        match self {
            Level::Collection => &[Level::Section, Level::Waypoint],
            Level::Section => &[Level::Panel],
            Level::Panel => &[Level::Block],
            Level::Block | Level::Waypoint => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Collection => "collection",
            Level::Section => "section",
            Level::Panel => "panel",
            Level::Block => "block",
            Level::Waypoint => "waypoint",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "collection" | "collections" => Ok(Level::Collection),
            "section" | "sections" => Ok(Level::Section),
            "panel" | "panels" => Ok(Level::Panel),
            "block" | "blocks" => Ok(Level::Block),
            "waypoint" | "waypoints" | "stop" | "stops" => Ok(Level::Waypoint),
            other => Err(format!("unknown level '{other}'")),
        }
    }
}

/// How many nesting levels of a root document a fetch materializes.
///
/// `0` returns root scalars only, `1` adds Section scalars and Waypoints, `2`
/// adds Panels and `3` is the full tree down to Blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Depth(u8);

impl Depth {
    pub const ROOT: Depth = Depth(0);
    pub const SECTIONS: Depth = Depth(1);
    pub const PANELS: Depth = Depth(2);
    pub const FULL: Depth = Depth(3);

    /// Creates a depth, clamping anything deeper than the tree to [`Depth::FULL`].
    pub fn new(depth: u8) -> Self {
        Depth(depth.min(Self::FULL.0))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Returns true if nodes of `level` are materialized at this depth.
    pub fn includes(self, level: Level) -> bool {
        self >= level.depth()
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The top-level array of a root document that holds a node's subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootField {
    Sections,
    Waypoints,
}

impl RootField {
    /// Depth a root must be read at before this field can be written back
    /// without dropping nested data.
    pub fn write_depth(self) -> Depth {
        match self {
            RootField::Sections => Depth::FULL,
            RootField::Waypoints => Depth::SECTIONS,
        }
    }
}

/// A Collection as persisted: the only unit of storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootDoc {
    pub id: ID,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
    /// Incremented by the backend on every successful write.
    #[serde(default)]
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<StoredSection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<StoredWaypoint>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RootDoc {
    /// Creates an empty Collection document with materialized child lists.
    pub fn new(id: ID, name: impl Into<String>, now_millis: u64) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            created_at: now_millis,
            updated_at: now_millis,
            revision: 0,
            sections: Some(Vec::new()),
            waypoints: Some(Vec::new()),
            extra: Map::new(),
        }
    }

    /// Returns a copy of this document materialized only down to `depth`.
    pub fn truncated(&self, depth: Depth) -> RootDoc {
        let mut doc = self.clone();
        if depth < Depth::SECTIONS {
            doc.sections = None;
            doc.waypoints = None;
            return doc;
        }
        for section in doc.sections.iter_mut().flatten() {
            if depth < Depth::PANELS {
                section.panels = None;
                continue;
            }
            if depth < Depth::FULL {
                for panel in section.panels.iter_mut().flatten() {
                    panel.blocks = None;
                }
            }
        }
        doc
    }

    /// Every materialized node in the tree with its level, in document order.
    pub fn node_ids(&self) -> Vec<(ID, Level)> {
        let mut ids = Vec::new();
        for section in self.sections.iter().flatten() {
            ids.push((section.id.clone(), Level::Section));
            for panel in section.panels.iter().flatten() {
                ids.push((panel.id.clone(), Level::Panel));
                for block in panel.blocks.iter().flatten() {
                    ids.push((block.id.clone(), Level::Block));
                }
            }
        }
        for waypoint in self.waypoints.iter().flatten() {
            ids.push((waypoint.id.clone(), Level::Waypoint));
        }
        ids
    }
}
