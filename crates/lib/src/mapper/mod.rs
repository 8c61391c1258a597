//! Translation between stored nodes and view models.
//!
//! Stored nodes carry persisted field names and no parent reference; views
//! carry stable names and the parent ID supplied by the caller's traversal.
//! Every function here is pure.
//!
//! For every level the round-trip laws hold on nodes as read at that level's
//! own depth (child arrays not materialized):
//!
//! ```
//! use vitrine::{ID, mapper::Mapper, document::StoredWaypoint};
//!
//! let stored: StoredWaypoint = serde_json::from_value(serde_json::json!({
//!     "id": "w1", "title": "Gate", "stopOrder": 2,
//!     "location": {"latitude": -1.9, "longitude": 30.1}
//! })).unwrap();
//! let view = stored.to_view(&ID::from("c1"));
//! assert_eq!(StoredWaypoint::to_storage(&view), stored);
//! ```

use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    ID, Result,
    backend::RootPatch,
    document::{
        Level, Location, Node, RootDoc, StoredBlock, StoredPanel, StoredSection,
        StoredWaypoint,
    },
    view::{
        AudioContent, BlockContent, BlockPatch, BlockView, CollectionPatch, CollectionTree,
        CollectionView, Coordinates, DisplayFlags, ImageContent, NewBlock, NewCollection,
        NewPanel, NewSection, NewWaypoint, PanelPatch, PanelTree, PanelView, QuoteContent,
        SectionPatch, SectionTree, SectionView, TextContent, Validate, VideoContent,
        WaypointPatch, WaypointView,
    },
};

mod errors;

pub use errors::MappingError;

/// Parses untyped JSON input as the model expected at `level`, then validates
/// it.
///
/// Used for creation and update input that arrives as JSON text (the CLI's
/// `--json` argument).
pub fn parse_input<T>(level: Level, value: Value) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let input: T = serde_json::from_value(value)
        .map_err(|source| MappingError::InvalidInput { level, source })?;
    input.validate()?;
    Ok(input)
}

/// Per-level conversion between the stored form and the view model.
pub trait Mapper: Node {
    type View: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync;
    type New: Validate + DeserializeOwned + Send + Sync;
    type Patch: Validate + DeserializeOwned + Send + Sync;

    /// Projects a stored node, injecting the parent ID from context.
    fn to_view(&self, parent_id: &ID) -> Self::View;

    /// Rebuilds the stored scalar fields of a node from its view.
    ///
    /// Child arrays are left unmaterialized.
    fn to_storage(view: &Self::View) -> Self;

    /// Builds a stored node from creation input, with an empty ID and order 0
    /// for the mutator to assign.
    fn new_to_storage(input: &Self::New) -> Self;

    /// The storage fields an update supplies; `null` values clear a field.
    fn patch_to_storage(patch: &Self::Patch) -> Map<String, Value>;
}

fn set_optional(fields: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    fields.insert(
        key.to_string(),
        value.clone().map(Value::String).unwrap_or(Value::Null),
    );
}

fn merge_attributes(fields: &mut Map<String, Value>, attributes: &Map<String, Value>) {
    for (key, value) in attributes {
        fields.insert(key.clone(), value.clone());
    }
}

/// Attributes supplied at creation; `null` means "not set" there.
fn initial_attributes(attributes: &Map<String, Value>) -> Map<String, Value> {
    attributes
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

impl Mapper for StoredSection {
    type View = SectionView;
    type New = NewSection;
    type Patch = SectionPatch;

    fn to_view(&self, parent_id: &ID) -> SectionView {
        SectionView {
            id: self.id.clone(),
            collection_id: parent_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            order: self.section_order,
            attributes: self.extra.clone(),
        }
    }

    fn to_storage(view: &SectionView) -> Self {
        StoredSection {
            id: view.id.clone(),
            title: view.title.clone(),
            description: view.description.clone(),
            section_order: view.order,
            panels: None,
            extra: view.attributes.clone(),
        }
    }

    fn new_to_storage(input: &NewSection) -> Self {
        StoredSection {
            id: ID::default(),
            title: input.title.trim().to_string(),
            description: input.description.clone(),
            section_order: 0,
            panels: Some(Vec::new()),
            extra: initial_attributes(&input.attributes),
        }
    }

    fn patch_to_storage(patch: &SectionPatch) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(title) = &patch.title {
            fields.insert("title".into(), Value::String(title.trim().to_string()));
        }
        if let Some(description) = &patch.description {
            set_optional(&mut fields, "description", description);
        }
        merge_attributes(&mut fields, &patch.attributes);
        fields
    }
}

impl Mapper for StoredPanel {
    type View = PanelView;
    type New = NewPanel;
    type Patch = PanelPatch;

    fn to_view(&self, parent_id: &ID) -> PanelView {
        PanelView {
            id: self.id.clone(),
            section_id: parent_id.clone(),
            title: self.title.clone(),
            order: self.panel_order,
            display: DisplayFlags {
                show_title: self.show_title,
                full_width: self.full_width,
                theme: self.theme.clone(),
            },
            attributes: self.extra.clone(),
        }
    }

    fn to_storage(view: &PanelView) -> Self {
        StoredPanel {
            id: view.id.clone(),
            title: view.title.clone(),
            panel_order: view.order,
            show_title: view.display.show_title,
            full_width: view.display.full_width,
            theme: view.display.theme.clone(),
            blocks: None,
            extra: view.attributes.clone(),
        }
    }

    fn new_to_storage(input: &NewPanel) -> Self {
        StoredPanel {
            id: ID::default(),
            title: input.title.trim().to_string(),
            panel_order: 0,
            show_title: input.display.show_title,
            full_width: input.display.full_width,
            theme: input.display.theme.clone(),
            blocks: Some(Vec::new()),
            extra: initial_attributes(&input.attributes),
        }
    }

    fn patch_to_storage(patch: &PanelPatch) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(title) = &patch.title {
            fields.insert("title".into(), Value::String(title.trim().to_string()));
        }
        if let Some(show_title) = patch.show_title {
            fields.insert("showTitle".into(), Value::Bool(show_title));
        }
        if let Some(full_width) = patch.full_width {
            fields.insert("fullWidth".into(), Value::Bool(full_width));
        }
        if let Some(theme) = &patch.theme {
            set_optional(&mut fields, "theme", theme);
        }
        merge_attributes(&mut fields, &patch.attributes);
        fields
    }
}

impl Mapper for StoredBlock {
    type View = BlockView;
    type New = NewBlock;
    type Patch = BlockPatch;

    fn to_view(&self, parent_id: &ID) -> BlockView {
        BlockView {
            id: self.id.clone(),
            panel_id: parent_id.clone(),
            order: self.block_order,
            content: content_from_storage(&self.kind, &self.content),
            attributes: self.extra.clone(),
        }
    }

    fn to_storage(view: &BlockView) -> Self {
        let (kind, content) = content_to_storage(&view.content);
        StoredBlock {
            id: view.id.clone(),
            kind,
            block_order: view.order,
            content,
            extra: view.attributes.clone(),
        }
    }

    fn new_to_storage(input: &NewBlock) -> Self {
        let (kind, content) = content_to_storage(&input.content);
        StoredBlock {
            id: ID::default(),
            kind,
            block_order: 0,
            content,
            extra: initial_attributes(&input.attributes),
        }
    }

    fn patch_to_storage(patch: &BlockPatch) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(content) = &patch.content {
            let (kind, content) = content_to_storage(content);
            fields.insert("type".into(), Value::String(kind));
            fields.insert("content".into(), content);
        }
        merge_attributes(&mut fields, &patch.attributes);
        fields
    }
}

impl Mapper for StoredWaypoint {
    type View = WaypointView;
    type New = NewWaypoint;
    type Patch = WaypointPatch;

    fn to_view(&self, parent_id: &ID) -> WaypointView {
        WaypointView {
            id: self.id.clone(),
            collection_id: parent_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            order: self.stop_order,
            coordinates: self.location.map(coordinates_from_location),
            attributes: self.extra.clone(),
        }
    }

    fn to_storage(view: &WaypointView) -> Self {
        StoredWaypoint {
            id: view.id.clone(),
            title: view.title.clone(),
            description: view.description.clone(),
            stop_order: view.order,
            location: view.coordinates.map(location_from_coordinates),
            extra: view.attributes.clone(),
        }
    }

    fn new_to_storage(input: &NewWaypoint) -> Self {
        StoredWaypoint {
            id: ID::default(),
            title: input.title.trim().to_string(),
            description: input.description.clone(),
            stop_order: 0,
            location: input.coordinates.map(location_from_coordinates),
            extra: initial_attributes(&input.attributes),
        }
    }

    fn patch_to_storage(patch: &WaypointPatch) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(title) = &patch.title {
            fields.insert("title".into(), Value::String(title.trim().to_string()));
        }
        if let Some(description) = &patch.description {
            set_optional(&mut fields, "description", description);
        }
        if let Some(coordinates) = &patch.coordinates {
            let location = match coordinates {
                Some(c) => serde_json::json!({ "latitude": c.lat, "longitude": c.lng }),
                None => Value::Null,
            };
            fields.insert("location".into(), location);
        }
        merge_attributes(&mut fields, &patch.attributes);
        fields
    }
}

fn coordinates_from_location(location: Location) -> Coordinates {
    Coordinates {
        lat: location.latitude,
        lng: location.longitude,
    }
}

fn location_from_coordinates(coordinates: Coordinates) -> Location {
    Location {
        latitude: coordinates.lat,
        longitude: coordinates.lng,
    }
}

/// Payload structs hold only strings, which always serialize.
fn payload_value<T: Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or(Value::Null)
}

/// Parses a payload only if it reproduces the stored JSON exactly.
fn decode<T: Serialize + DeserializeOwned>(content: &Value) -> Option<T> {
    let payload: T = serde_json::from_value(content.clone()).ok()?;
    (payload_value(&payload) == *content).then_some(payload)
}

/// Interprets stored `type` + `content` as typed block content.
pub fn content_from_storage(kind: &str, content: &Value) -> BlockContent {
    let typed = match kind {
        "text" => decode::<TextContent>(content).map(BlockContent::Text),
        "image" => decode::<ImageContent>(content).map(BlockContent::Image),
        "video" => decode::<VideoContent>(content).map(BlockContent::Video),
        "audio" => decode::<AudioContent>(content).map(BlockContent::Audio),
        "quote" => decode::<QuoteContent>(content).map(BlockContent::Quote),
        _ => None,
    };
    typed.unwrap_or_else(|| BlockContent::Other {
        kind: kind.to_string(),
        content: content.clone(),
    })
}

/// Splits typed block content into its stored `type` and `content`.
pub fn content_to_storage(content: &BlockContent) -> (String, Value) {
    let value = match content {
        BlockContent::Text(payload) => payload_value(payload),
        BlockContent::Image(payload) => payload_value(payload),
        BlockContent::Video(payload) => payload_value(payload),
        BlockContent::Audio(payload) => payload_value(payload),
        BlockContent::Quote(payload) => payload_value(payload),
        BlockContent::Other { content, .. } => content.clone(),
    };
    (content.kind().to_string(), value)
}

// ===== Collection =====

pub fn collection_to_view(root: &RootDoc) -> CollectionView {
    CollectionView {
        id: root.id.clone(),
        name: root.name.clone(),
        description: root.description.clone(),
        created_at: root.created_at,
        updated_at: root.updated_at,
        revision: root.revision,
        attributes: root.extra.clone(),
    }
}

/// Builds a new, empty root document; timestamps are stamped by the backend.
pub fn new_collection_to_storage(input: &NewCollection, id: ID) -> RootDoc {
    let mut root = RootDoc::new(id, input.name.trim(), 0);
    root.description = input.description.clone();
    root.extra = initial_attributes(&input.attributes);
    root
}

pub fn collection_patch_to_storage(patch: &CollectionPatch) -> RootPatch {
    let mut root_patch = RootPatch::new();
    if let Some(name) = &patch.name {
        root_patch = root_patch.with_name(name.trim());
    }
    if let Some(description) = &patch.description {
        root_patch = root_patch.with_description(description.clone());
    }
    for (key, value) in &patch.attributes {
        root_patch = root_patch.with_extra(key.clone(), value.clone());
    }
    root_patch
}

fn sorted<N: Node>(nodes: Option<&Vec<N>>) -> Vec<&N> {
    let mut nodes: Vec<&N> = nodes.map(|n| n.iter().collect()).unwrap_or_default();
    nodes.sort_by_key(|node| node.order());
    nodes
}

/// Projects a full-depth root document into nested views.
pub fn tree_to_view(root: &RootDoc) -> CollectionTree {
    let sections = sorted(root.sections.as_ref())
        .into_iter()
        .map(|section| SectionTree {
            section: section.to_view(&root.id),
            panels: sorted(section.panels.as_ref())
                .into_iter()
                .map(|panel| PanelTree {
                    panel: panel.to_view(&section.id),
                    blocks: sorted(panel.blocks.as_ref())
                        .into_iter()
                        .map(|block| block.to_view(&panel.id))
                        .collect(),
                })
                .collect(),
        })
        .collect();
    let waypoints = sorted(root.waypoints.as_ref())
        .into_iter()
        .map(|waypoint| waypoint.to_view(&root.id))
        .collect();
    CollectionTree {
        collection: collection_to_view(root),
        sections,
        waypoints,
    }
}
