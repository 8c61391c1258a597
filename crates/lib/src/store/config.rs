//! Facade configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_INVALIDATION_CAPACITY, DEFAULT_SCAN_LIMIT};

/// How a read-modify-write cycle guards against concurrent writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Writes are unguarded. When two callers edit the same Collection
    /// concurrently, the later write silently replaces the earlier one.
    #[default]
    LastWriteWins,
    /// Each write carries the revision it was computed from and fails with
    /// [`crate::store::StoreError::Conflict`] if the Collection changed.
    Optimistic,
}

/// Configuration for [`crate::ExhibitStore`].
///
/// # Example
///
/// ```
/// use vitrine::store::{ConcurrencyMode, StoreConfig};
///
/// let config = StoreConfig::default()
///     .with_scan_limit(500)
///     .with_concurrency(ConcurrencyMode::Optimistic)
///     .with_node_index(true);
/// assert_eq!(config.scan_limit, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of collections the locator inspects per lookup.
    pub scan_limit: usize,
    pub concurrency: ConcurrencyMode,
    /// Keep an in-process node → collection index to skip most scans.
    pub node_index: bool,
    /// Buffer size of the invalidation channel; slow subscribers that fall
    /// further behind miss events.
    pub invalidation_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            scan_limit: DEFAULT_SCAN_LIMIT,
            concurrency: ConcurrencyMode::default(),
            node_index: false,
            invalidation_capacity: DEFAULT_INVALIDATION_CAPACITY,
        }
    }
}

impl StoreConfig {
    pub fn with_scan_limit(mut self, scan_limit: usize) -> Self {
        self.scan_limit = scan_limit;
        self
    }

    pub fn with_concurrency(mut self, concurrency: ConcurrencyMode) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_node_index(mut self, enabled: bool) -> Self {
        self.node_index = enabled;
        self
    }

    pub fn with_invalidation_capacity(mut self, capacity: usize) -> Self {
        self.invalidation_capacity = capacity;
        self
    }
}
