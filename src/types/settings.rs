use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Panel engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Interval between refresh passes over the active downloads, in
    /// milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Maximum number of downloads fetched by the initial listing.
    #[serde(default = "default_listing_limit")]
    pub listing_limit: usize,
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_listing_limit() -> usize {
    100
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            listing_limit: default_listing_limit(),
        }
    }
}

impl PanelConfig {
    /// Parses a configuration from a JSON document. Missing fields fall
    /// back to their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
