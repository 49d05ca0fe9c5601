use foundation::time::Time;
use serde::{Deserialize, Serialize};

/// Story-wide tunables. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    pub resize_debounce_ms: u64,
    /// Boundary polygons entirely at or above this latitude are dropped.
    pub latitude_limit_deg: Option<f64>,
    /// Pie slices below this share of the total fold into "Other".
    pub other_threshold: f64,
    pub layout_breakpoint_px: f64,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 50,
            latitude_limit_deg: Some(75.0),
            other_threshold: 0.05,
            layout_breakpoint_px: 768.0,
        }
    }
}

impl StoryConfig {
    pub fn debounce_window(&self) -> Time {
        Time::from_millis(self.resize_debounce_ms)
    }

    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
