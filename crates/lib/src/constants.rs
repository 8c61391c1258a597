//! Constants used throughout the Vitrine library.
//!
//! Storage field names are the keys persisted inside root documents; they are
//! referenced by the mutator when it guards protected fields during merges and
//! by input validation to reserve them from free-form attributes.

/// Default number of root documents the locator scans before giving up.
pub const DEFAULT_SCAN_LIMIT: usize = 100;

/// Default capacity of the invalidation broadcast channel.
pub const DEFAULT_INVALIDATION_CAPACITY: usize = 64;

/// Storage key holding a node's identifier.
pub const ID_KEY: &str = "id";

/// Storage key of a Section's order within its Collection.
pub const SECTION_ORDER_KEY: &str = "sectionOrder";

/// Storage key of a Panel's order within its Section.
pub const PANEL_ORDER_KEY: &str = "panelOrder";

/// Storage key of a Block's order within its Panel.
pub const BLOCK_ORDER_KEY: &str = "blockOrder";

/// Storage key of a Waypoint's order within its Collection.
pub const STOP_ORDER_KEY: &str = "stopOrder";

/// Storage key of the Sections array on a Collection.
pub const SECTIONS_KEY: &str = "sections";

/// Storage key of the Waypoints array on a Collection.
pub const WAYPOINTS_KEY: &str = "waypoints";

/// Storage key of the Panels array on a Section.
pub const PANELS_KEY: &str = "panels";

/// Storage key of the Blocks array on a Panel.
pub const BLOCKS_KEY: &str = "blocks";
