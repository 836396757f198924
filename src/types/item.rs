use serde::{Deserialize, Serialize};

use super::download::DownloadId;

/// Semantic state of a panel item, derived from the latest host record.
/// Precedence order: Failed, Canceled, Paused, Complete, InProgress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Failed,
    Canceled,
    Paused,
    Complete,
    InProgress,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Failed => "failed",
            ItemState::Canceled => "canceled",
            ItemState::Paused => "paused",
            ItemState::Complete => "complete",
            ItemState::InProgress => "in_progress",
        }
    }

    /// Label for the item's state toggle button.
    pub fn button_label(&self) -> &'static str {
        match self {
            ItemState::Paused => "Resume",
            ItemState::Canceled | ItemState::Failed => "Retry?",
            _ => "Pause",
        }
    }
}

/// The engine's derived, renderer-facing representation of one download.
///
/// Created on first discovery, mutated in place by the merger on every
/// change event and poll tick, removed only when the host erases the
/// download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelItem {
    pub id: DownloadId,
    pub url: String,
    pub file_name: String,
    pub file_path: String,
    pub hostname: String,
    pub state: ItemState,
    /// Human-readable size, e.g. "1.5 MB" or "1.5 MB of 3.0 MB".
    pub size: String,
    /// 0–100, one decimal place.
    pub percentage: f64,
    pub date_time: String,
    pub remaining: String,
    pub speed: String,
    pub state_button_text: String,
    /// True while the item is Paused or InProgress.
    pub in_progress: bool,
    /// Filled asynchronously; stays None when the host cannot provide one.
    pub icon_url: Option<String>,
    pub selected: bool,
}
