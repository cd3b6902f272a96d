use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Pixel grid that normalized widget positions are mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub reference_width: u32,
    pub reference_height: u32,
    pub frame_interval_ms: u64,
}

impl DisplayConfig {
    pub fn reference(&self) -> Resolution {
        Resolution::new(self.reference_width, self.reference_height)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            reference_width: 1024,
            reference_height: 600,
            frame_interval_ms: 1000,
        }
    }
}
