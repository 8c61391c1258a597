use std::fmt::Debug;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use super::{Level, NodePath, ParentPath, RootDoc, RootField};
use crate::{ID, constants};

/// A node type that lives in one sibling list of a root document.
///
/// Implementations tie a stored struct to its level, its order key and the
/// array that holds it, which is everything the locator and mutator need to
/// work on any level generically.
pub trait Node:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const LEVEL: Level;

    /// Storage key of the order field.
    const ORDER_KEY: &'static str;

    /// Storage key of the child array, if this level owns children.
    const CHILDREN_KEY: Option<&'static str>;

    /// Top-level root field rewritten when a node of this level changes.
    const ROOT_FIELD: RootField;

    fn id(&self) -> &ID;
    fn set_id(&mut self, id: ID);
    fn order(&self) -> u64;
    fn set_order(&mut self, order: u64);

    /// The sibling list at `parent`, or `None` if it does not exist or was not
    /// materialized.
    fn siblings<'a>(root: &'a RootDoc, parent: &ParentPath) -> Option<&'a Vec<Self>>;

    /// Mutable access to the sibling list at `parent`.
    ///
    /// A missing list on an existing parent is created empty.
    fn siblings_mut<'a>(root: &'a mut RootDoc, parent: &ParentPath) -> Option<&'a mut Vec<Self>>;

    /// IDs of every node nested below this one.
    fn descendant_ids(&self) -> Vec<ID> {
        Vec::new()
    }

    /// The node at `path`, if the path addresses this level and is in bounds.
    fn at<'a>(root: &'a RootDoc, path: &NodePath) -> Option<&'a Self> {
        if path.level() != Self::LEVEL {
            return None;
        }
        Self::siblings(root, &path.parent())?.get(path.index())
    }
}

fn default_true() -> bool {
    true
}

/// A Section as persisted inside its Collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSection {
    pub id: ID,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub section_order: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panels: Option<Vec<StoredPanel>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A Panel as persisted inside its Section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPanel {
    pub id: ID,
    pub title: String,
    #[serde(default)]
    pub panel_order: u64,
    #[serde(default = "default_true")]
    pub show_title: bool,
    #[serde(default)]
    pub full_width: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<StoredBlock>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A content Block as persisted inside its Panel.
///
/// `content` is free-form JSON whose shape depends on `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlock {
    pub id: ID,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub block_order: u64,
    #[serde(default)]
    pub content: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Geographic position of a Waypoint as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A Waypoint as persisted in its Collection's stop list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWaypoint {
    pub id: ID,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub stop_order: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node for StoredSection {
    const LEVEL: Level = Level::Section;
    const ORDER_KEY: &'static str = constants::SECTION_ORDER_KEY;
    const CHILDREN_KEY: Option<&'static str> = Some(constants::PANELS_KEY);
    const ROOT_FIELD: RootField = RootField::Sections;

    fn id(&self) -> &ID {
        &self.id
    }

    fn set_id(&mut self, id: ID) {
        self.id = id;
    }

    fn order(&self) -> u64 {
        self.section_order
    }

    fn set_order(&mut self, order: u64) {
        self.section_order = order;
    }

    fn siblings<'a>(root: &'a RootDoc, parent: &ParentPath) -> Option<&'a Vec<Self>> {
        match parent {
            ParentPath::Collection => root.sections.as_ref(),
            _ => None,
        }
    }

    fn siblings_mut<'a>(root: &'a mut RootDoc, parent: &ParentPath) -> Option<&'a mut Vec<Self>> {
        match parent {
            ParentPath::Collection => Some(root.sections.get_or_insert_with(Vec::new)),
            _ => None,
        }
    }

    fn descendant_ids(&self) -> Vec<ID> {
        let mut ids = Vec::new();
        for panel in self.panels.iter().flatten() {
            ids.push(panel.id.clone());
            ids.extend(panel.descendant_ids());
        }
        ids
    }
}

impl Node for StoredPanel {
    const LEVEL: Level = Level::Panel;
    const ORDER_KEY: &'static str = constants::PANEL_ORDER_KEY;
    const CHILDREN_KEY: Option<&'static str> = Some(constants::BLOCKS_KEY);
    const ROOT_FIELD: RootField = RootField::Sections;

    fn id(&self) -> &ID {
        &self.id
    }

    fn set_id(&mut self, id: ID) {
        self.id = id;
    }

    fn order(&self) -> u64 {
        self.panel_order
    }

    fn set_order(&mut self, order: u64) {
        self.panel_order = order;
    }

    fn siblings<'a>(root: &'a RootDoc, parent: &ParentPath) -> Option<&'a Vec<Self>> {
        match *parent {
            ParentPath::Section { section } => {
                root.sections.as_ref()?.get(section)?.panels.as_ref()
            }
            _ => None,
        }
    }

    fn siblings_mut<'a>(root: &'a mut RootDoc, parent: &ParentPath) -> Option<&'a mut Vec<Self>> {
        match *parent {
            ParentPath::Section { section } => {
                let section = root.sections.as_mut()?.get_mut(section)?;
                Some(section.panels.get_or_insert_with(Vec::new))
            }
            _ => None,
        }
    }

    fn descendant_ids(&self) -> Vec<ID> {
        self.blocks
            .iter()
            .flatten()
            .map(|block| block.id.clone())
            .collect()
    }
}

impl Node for StoredBlock {
    const LEVEL: Level = Level::Block;
    const ORDER_KEY: &'static str = constants::BLOCK_ORDER_KEY;
    const CHILDREN_KEY: Option<&'static str> = None;
    const ROOT_FIELD: RootField = RootField::Sections;

    fn id(&self) -> &ID {
        &self.id
    }

    fn set_id(&mut self, id: ID) {
        self.id = id;
    }

    fn order(&self) -> u64 {
        self.block_order
    }

    fn set_order(&mut self, order: u64) {
        self.block_order = order;
    }

    fn siblings<'a>(root: &'a RootDoc, parent: &ParentPath) -> Option<&'a Vec<Self>> {
        match *parent {
            ParentPath::Panel { section, panel } => root
                .sections
                .as_ref()?
                .get(section)?
                .panels
                .as_ref()?
                .get(panel)?
                .blocks
                .as_ref(),
            _ => None,
        }
    }

    fn siblings_mut<'a>(root: &'a mut RootDoc, parent: &ParentPath) -> Option<&'a mut Vec<Self>> {
        match *parent {
            ParentPath::Panel { section, panel } => {
                let panel = root
                    .sections
                    .as_mut()?
                    .get_mut(section)?
                    .panels
                    .as_mut()?
                    .get_mut(panel)?;
                Some(panel.blocks.get_or_insert_with(Vec::new))
            }
            _ => None,
        }
    }
}

impl Node for StoredWaypoint {
    const LEVEL: Level = Level::Waypoint;
    const ORDER_KEY: &'static str = constants::STOP_ORDER_KEY;
    const CHILDREN_KEY: Option<&'static str> = None;
    const ROOT_FIELD: RootField = RootField::Waypoints;

    fn id(&self) -> &ID {
        &self.id
    }

    fn set_id(&mut self, id: ID) {
        self.id = id;
    }

    fn order(&self) -> u64 {
        self.stop_order
    }

    fn set_order(&mut self, order: u64) {
        self.stop_order = order;
    }

    fn siblings<'a>(root: &'a RootDoc, parent: &ParentPath) -> Option<&'a Vec<Self>> {
        match parent {
            ParentPath::Collection => root.waypoints.as_ref(),
            _ => None,
        }
    }

    fn siblings_mut<'a>(root: &'a mut RootDoc, parent: &ParentPath) -> Option<&'a mut Vec<Self>> {
        match parent {
            ParentPath::Collection => Some(root.waypoints.get_or_insert_with(Vec::new)),
            _ => None,
        }
    }
}
