/// Engine configuration
///
/// Defaults mirror the venue's UI feed: 25 levels retained per side, 12
/// shown, refreshed once per second. The struct can be loaded from a JSON
/// file; absent fields fall back to their defaults.

use crate::domain::aggregation::DEFAULT_SHOWN_ELEMENTS;
use crate::domain::orderbook::DEFAULT_CAPACITY;
use crate::shared::error::ConfigError;
use crate::shared::protocol::{ProductId, DELTA_FEED, SNAPSHOT_FEED};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum retained levels per side
    pub capacity_per_side: usize,

    /// Maximum rows surfaced per side on refresh
    pub shown_elements: usize,

    /// Display refresh cadence
    pub refresh_interval_ms: u64,

    /// Instrument this engine tracks
    pub product_id: ProductId,

    pub snapshot_feed: String,

    pub delta_feed: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity_per_side: DEFAULT_CAPACITY,
            shown_elements: DEFAULT_SHOWN_ELEMENTS,
            refresh_interval_ms: 1000,
            product_id: ProductId::default(),
            snapshot_feed: SNAPSHOT_FEED.to_string(),
            delta_feed: DELTA_FEED.to_string(),
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: EngineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity_per_side == 0 {
            return Err(ConfigError::Zero { field: "capacity_per_side" });
        }
        if self.shown_elements == 0 {
            return Err(ConfigError::Zero { field: "shown_elements" });
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::Zero { field: "refresh_interval_ms" });
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
