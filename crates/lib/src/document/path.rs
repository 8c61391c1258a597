//! Index paths into a root document.
//!
//! A node has no storage record of its own; it is addressed by the chain of
//! array indices leading to it from the owning Collection.

use std::fmt;

use super::{Level, RootDoc};
use crate::ID;

/// Location of a sibling list inside a root document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentPath {
    /// The Collection itself, owner of the Sections and Waypoints lists.
    Collection,
    /// A Section, owner of a Panels list.
    Section { section: usize },
    /// A Panel, owner of a Blocks list.
    Panel { section: usize, panel: usize },
}

impl ParentPath {
    /// The level of the node owning the list.
    pub fn level(&self) -> Level {
        match self {
            ParentPath::Collection => Level::Collection,
            ParentPath::Section { .. } => Level::Section,
            ParentPath::Panel { .. } => Level::Panel,
        }
    }

    /// ID of the node owning the list, if the path exists in `root`.
    pub fn owner_id<'a>(&self, root: &'a RootDoc) -> Option<&'a ID> {
        match *self {
            ParentPath::Collection => Some(&root.id),
            ParentPath::Section { section } => Some(&root.sections.as_ref()?.get(section)?.id),
            ParentPath::Panel { section, panel } => Some(
                &root
                    .sections
                    .as_ref()?
                    .get(section)?
                    .panels
                    .as_ref()?
                    .get(panel)?
                    .id,
            ),
        }
    }

    /// Path of the child at `index` in this list, if `level` can live here.
    pub fn child(&self, level: Level, index: usize) -> Option<NodePath> {
        match (self, level) {
            (ParentPath::Collection, Level::Section) => Some(NodePath::Section { section: index }),
            (ParentPath::Collection, Level::Waypoint) => {
                Some(NodePath::Waypoint { waypoint: index })
            }
            (ParentPath::Section { section }, Level::Panel) => Some(NodePath::Panel {
                section: *section,
                panel: index,
            }),
            (ParentPath::Panel { section, panel }, Level::Block) => Some(NodePath::Block {
                section: *section,
                panel: *panel,
                block: index,
            }),
            _ => None,
        }
    }
}

/// Full path to a node inside a root document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodePath {
    Section {
        section: usize,
    },
    Panel {
        section: usize,
        panel: usize,
    },
    Block {
        section: usize,
        panel: usize,
        block: usize,
    },
    Waypoint {
        waypoint: usize,
    },
}

impl NodePath {
    /// The level of the node this path addresses.
    pub fn level(&self) -> Level {
        match self {
            NodePath::Section { .. } => Level::Section,
            NodePath::Panel { .. } => Level::Panel,
            NodePath::Block { .. } => Level::Block,
            NodePath::Waypoint { .. } => Level::Waypoint,
        }
    }

    /// Path of the list that contains this node.
    pub fn parent(&self) -> ParentPath {
        match *self {
            NodePath::Section { .. } | NodePath::Waypoint { .. } => ParentPath::Collection,
            NodePath::Panel { section, .. } => ParentPath::Section { section },
            NodePath::Block { section, panel, .. } => ParentPath::Panel { section, panel },
        }
    }

    /// Index of the node within its sibling list.
    pub fn index(&self) -> usize {
        match *self {
            NodePath::Section { section } => section,
            NodePath::Panel { panel, .. } => panel,
            NodePath::Block { block, .. } => block,
            NodePath::Waypoint { waypoint } => waypoint,
        }
    }

    /// The chain of array indices from the root, outermost first.
    pub fn indices(&self) -> Vec<usize> {
        match *self {
            NodePath::Section { section } => vec![section],
            NodePath::Panel { section, panel } => vec![section, panel],
            NodePath::Block {
                section,
                panel,
                block,
            } => vec![section, panel, block],
            NodePath::Waypoint { waypoint } => vec![waypoint],
        }
    }

    /// This node viewed as the owner of a child list.
    ///
    /// Returns `None` for Blocks and Waypoints, which own no children.
    pub fn as_parent(&self) -> Option<ParentPath> {
        match *self {
            NodePath::Section { section } => Some(ParentPath::Section { section }),
            NodePath::Panel { section, panel } => Some(ParentPath::Panel { section, panel }),
            NodePath::Block { .. } | NodePath::Waypoint { .. } => None,
        }
    }
}

impl fmt::Display for ParentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParentPath::Collection => f.write_str("root"),
            ParentPath::Section { section } => write!(f, "sections[{section}]"),
            ParentPath::Panel { section, panel } => {
                write!(f, "sections[{section}].panels[{panel}]")
            }
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            NodePath::Section { section } => write!(f, "sections[{section}]"),
            NodePath::Panel { section, panel } => {
                write!(f, "sections[{section}].panels[{panel}]")
            }
            NodePath::Block {
                section,
                panel,
                block,
            } => write!(f, "sections[{section}].panels[{panel}].blocks[{block}]"),
            NodePath::Waypoint { waypoint } => write!(f, "waypoints[{waypoint}]"),
        }
    }
}
