use serde::{Deserialize, Serialize};

/// Time primitives.
///
/// Event timestamps are supplied by the host (browser clock, tokio clock or a
/// test script) so debouncing and transitions stay replayable.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn from_millis(ms: u64) -> Self {
        Time(ms as f64 / 1000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }

    pub fn after(self, delay: Time) -> Self {
        Time(self.0 + delay.0)
    }
}
