//! View models exposed to callers.
//!
//! Views use stable snake_case names and carry an explicit parent reference
//! that the stored form lacks. Creation inputs (`New*`) and update inputs
//! (`*Patch`) are validated before any I/O happens.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{
    ID, Result,
    constants::{
        BLOCK_ORDER_KEY, BLOCKS_KEY, ID_KEY, PANEL_ORDER_KEY, PANELS_KEY, SECTION_ORDER_KEY,
        SECTIONS_KEY, STOP_ORDER_KEY, WAYPOINTS_KEY,
    },
    document::Level,
    store::StoreError,
};

/// Deserializes a present field (even `null`) as `Some`, so a patch can tell
/// "clear this field" apart from "leave it alone".
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Input checks run before any store access.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(level: Level, field: &str, reason: impl Into<String>) -> crate::Error {
    StoreError::ValidationFailed {
        level,
        field: field.to_string(),
        reason: reason.into(),
    }
    .into()
}

fn require_text(level: Level, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(level, field, "must not be blank"));
    }
    Ok(())
}

/// Attribute keys may not shadow the typed storage fields of their level.
fn check_attributes(level: Level, attributes: &Map<String, Value>, reserved: &[&str]) -> Result<()> {
    for key in attributes.keys() {
        if key.is_empty() {
            return Err(invalid(level, "attributes", "attribute names must not be empty"));
        }
        if reserved.contains(&key.as_str()) {
            return Err(invalid(
                level,
                "attributes",
                format!("'{key}' is a reserved field name"),
            ));
        }
    }
    Ok(())
}

// ===== Collection =====

/// A Collection's own fields, without its nested tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionView {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
    pub revision: u64,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCollection {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl NewCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

const COLLECTION_KEYS: &[&str] = &[
    ID_KEY,
    "name",
    "description",
    "createdAt",
    "updatedAt",
    "revision",
    SECTIONS_KEY,
    WAYPOINTS_KEY,
];

impl Validate for NewCollection {
    fn validate(&self) -> Result<()> {
        require_text(Level::Collection, "name", &self.name)?;
        check_attributes(Level::Collection, &self.attributes, COLLECTION_KEYS)
    }
}

impl Validate for CollectionPatch {
    fn validate(&self) -> Result<()> {
        if self.name.is_none() && self.description.is_none() && self.attributes.is_empty() {
            return Err(invalid(Level::Collection, "patch", "no fields to update"));
        }
        if let Some(name) = &self.name {
            require_text(Level::Collection, "name", name)?;
        }
        check_attributes(Level::Collection, &self.attributes, COLLECTION_KEYS)
    }
}

// ===== Section =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionView {
    pub id: ID,
    pub collection_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub order: u64,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSection {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl NewSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

pub(crate) const SECTION_KEYS: &[&str] = &[ID_KEY, "title", "description", SECTION_ORDER_KEY, PANELS_KEY];

impl Validate for NewSection {
    fn validate(&self) -> Result<()> {
        require_text(Level::Section, "title", &self.title)?;
        check_attributes(Level::Section, &self.attributes, SECTION_KEYS)
    }
}

impl Validate for SectionPatch {
    fn validate(&self) -> Result<()> {
        if self.title.is_none() && self.description.is_none() && self.attributes.is_empty() {
            return Err(invalid(Level::Section, "patch", "no fields to update"));
        }
        if let Some(title) = &self.title {
            require_text(Level::Section, "title", title)?;
        }
        check_attributes(Level::Section, &self.attributes, SECTION_KEYS)
    }
}

// ===== Panel =====

/// Per-panel presentation switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFlags {
    #[serde(default = "default_show_title")]
    pub show_title: bool,
    #[serde(default)]
    pub full_width: bool,
    #[serde(default)]
    pub theme: Option<String>,
}

fn default_show_title() -> bool {
    true
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            show_title: true,
            full_width: false,
            theme: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelView {
    pub id: ID,
    pub section_id: ID,
    pub title: String,
    pub order: u64,
    pub display: DisplayFlags,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPanel {
    pub title: String,
    #[serde(default)]
    pub display: DisplayFlags,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl NewPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub show_title: Option<bool>,
    #[serde(default)]
    pub full_width: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub theme: Option<Option<String>>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

pub(crate) const PANEL_KEYS: &[&str] = &[
    ID_KEY,
    "title",
    PANEL_ORDER_KEY,
    "showTitle",
    "fullWidth",
    "theme",
    BLOCKS_KEY,
];

impl Validate for NewPanel {
    fn validate(&self) -> Result<()> {
        require_text(Level::Panel, "title", &self.title)?;
        check_attributes(Level::Panel, &self.attributes, PANEL_KEYS)
    }
}

impl Validate for PanelPatch {
    fn validate(&self) -> Result<()> {
        if self.title.is_none()
            && self.show_title.is_none()
            && self.full_width.is_none()
            && self.theme.is_none()
            && self.attributes.is_empty()
        {
            return Err(invalid(Level::Panel, "patch", "no fields to update"));
        }
        if let Some(title) = &self.title {
            require_text(Level::Panel, "title", title)?;
        }
        check_attributes(Level::Panel, &self.attributes, PANEL_KEYS)
    }
}

// ===== Block =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContent {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioContent {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteContent {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

/// Typed payload of a Block, keyed by its `type`.
///
/// Stored content that does not exactly match a known shape is surfaced as
/// [`BlockContent::Other`] and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    Text(TextContent),
    Image(ImageContent),
    Video(VideoContent),
    Audio(AudioContent),
    Quote(QuoteContent),
    Other { kind: String, content: Value },
}

impl BlockContent {
    pub const KNOWN_KINDS: &'static [&'static str] = &["text", "image", "video", "audio", "quote"];

    pub fn text(body: impl Into<String>) -> Self {
        BlockContent::Text(TextContent { body: body.into() })
    }

    pub fn image(url: impl Into<String>) -> Self {
        BlockContent::Image(ImageContent {
            url: url.into(),
            caption: None,
            alt_text: None,
        })
    }

    /// The storage `type` string of this content.
    pub fn kind(&self) -> &str {
        match self {
            BlockContent::Text(_) => "text",
            BlockContent::Image(_) => "image",
            BlockContent::Video(_) => "video",
            BlockContent::Audio(_) => "audio",
            BlockContent::Quote(_) => "quote",
            BlockContent::Other { kind, .. } => kind,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            BlockContent::Text(text) => require_text(Level::Block, "content.body", &text.body),
            BlockContent::Image(ImageContent { url, .. })
            | BlockContent::Video(VideoContent { url, .. })
            | BlockContent::Audio(AudioContent { url, .. }) => {
                require_text(Level::Block, "content.url", url)
            }
            BlockContent::Quote(quote) => require_text(Level::Block, "content.text", &quote.text),
            BlockContent::Other { kind, .. } => {
                require_text(Level::Block, "content.kind", kind)?;
                if Self::KNOWN_KINDS.contains(&kind.as_str()) {
                    return Err(invalid(
                        Level::Block,
                        "content.kind",
                        format!("'{kind}' blocks must use the typed content variant"),
                    ));
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockView {
    pub id: ID,
    pub panel_id: ID,
    pub order: u64,
    pub content: BlockContent,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBlock {
    pub content: BlockContent,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl NewBlock {
    pub fn new(content: BlockContent) -> Self {
        Self {
            content,
            attributes: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockPatch {
    #[serde(default)]
    pub content: Option<BlockContent>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

pub(crate) const BLOCK_KEYS: &[&str] = &[ID_KEY, "type", BLOCK_ORDER_KEY, "content"];

impl Validate for NewBlock {
    fn validate(&self) -> Result<()> {
        self.content.validate()?;
        check_attributes(Level::Block, &self.attributes, BLOCK_KEYS)
    }
}

impl Validate for BlockPatch {
    fn validate(&self) -> Result<()> {
        if self.content.is_none() && self.attributes.is_empty() {
            return Err(invalid(Level::Block, "patch", "no fields to update"));
        }
        if let Some(content) = &self.content {
            content.validate()?;
        }
        check_attributes(Level::Block, &self.attributes, BLOCK_KEYS)
    }
}

// ===== Waypoint =====

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(invalid(
                Level::Waypoint,
                "coordinates.lat",
                "latitude must be within [-90, 90]",
            ));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(invalid(
                Level::Waypoint,
                "coordinates.lng",
                "longitude must be within [-180, 180]",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointView {
    pub id: ID,
    pub collection_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub order: u64,
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewWaypoint {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl NewWaypoint {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub coordinates: Option<Option<Coordinates>>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

pub(crate) const WAYPOINT_KEYS: &[&str] = &[ID_KEY, "title", "description", STOP_ORDER_KEY, "location"];

impl Validate for NewWaypoint {
    fn validate(&self) -> Result<()> {
        require_text(Level::Waypoint, "title", &self.title)?;
        if let Some(coordinates) = &self.coordinates {
            coordinates.validate()?;
        }
        check_attributes(Level::Waypoint, &self.attributes, WAYPOINT_KEYS)
    }
}

impl Validate for WaypointPatch {
    fn validate(&self) -> Result<()> {
        if self.title.is_none()
            && self.description.is_none()
            && self.coordinates.is_none()
            && self.attributes.is_empty()
        {
            return Err(invalid(Level::Waypoint, "patch", "no fields to update"));
        }
        if let Some(title) = &self.title {
            require_text(Level::Waypoint, "title", title)?;
        }
        if let Some(Some(coordinates)) = &self.coordinates {
            coordinates.validate()?;
        }
        check_attributes(Level::Waypoint, &self.attributes, WAYPOINT_KEYS)
    }
}

// ===== Tree =====

/// A Panel with its Blocks in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelTree {
    #[serde(flatten)]
    pub panel: PanelView,
    pub blocks: Vec<BlockView>,
}

/// A Section with its Panels in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTree {
    #[serde(flatten)]
    pub section: SectionView,
    pub panels: Vec<PanelTree>,
}

/// A whole Collection as nested views, every list sorted by order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionTree {
    #[serde(flatten)]
    pub collection: CollectionView,
    pub sections: Vec<SectionTree>,
    pub waypoints: Vec<WaypointView>,
}
