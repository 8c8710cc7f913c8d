// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Session configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of an [`InteractiveSession`](crate::InteractiveSession).
///
/// Missing fields take their default when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long the render thread waits for the UI thread to repaint after
    /// a pass, in milliseconds. `None` waits forever.
    pub handshake_timeout_ms: Option<u64>,
    /// Outline tiles on the display as the engine starts them.
    pub draw_tile_brackets: bool,
    /// Arm length of the tile outlines, in pixels.
    pub bracket_extent: u32,
    /// Name given to the render thread.
    pub render_thread_name: String,
    /// How long [`end`](crate::InteractiveSession::end) waits for a UI task
    /// before checking on the render thread again, in milliseconds.
    pub ui_pump_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            handshake_timeout_ms: Some(10_000),
            draw_tile_brackets: false,
            bracket_extent: 5,
            render_thread_name: "seedling-render".to_string(),
            ui_pump_interval_ms: 5,
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The handshake timeout as a [`Duration`].
    pub fn handshake_timeout(&self) -> Option<Duration> {
        self.handshake_timeout_ms.map(Duration::from_millis)
    }

    /// The teardown pump interval as a [`Duration`]. Never zero.
    pub fn ui_pump_interval(&self) -> Duration {
        Duration::from_millis(self.ui_pump_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SessionConfig::from_json_str(r#"{ "draw_tile_brackets": true }"#).unwrap();
        assert!(config.draw_tile_brackets);
        assert_eq!(config.bracket_extent, 5);
        assert_eq!(config.handshake_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn null_timeout_waits_forever() {
        let config = SessionConfig::from_json_str(r#"{ "handshake_timeout_ms": null }"#).unwrap();
        assert_eq!(config.handshake_timeout(), None);
    }

    #[test]
    fn zero_pump_interval_is_clamped() {
        let config = SessionConfig {
            ui_pump_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.ui_pump_interval(), Duration::from_millis(1));
    }
}
