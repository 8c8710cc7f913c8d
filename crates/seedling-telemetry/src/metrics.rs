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

//! Counters updated from both the UI and the render thread.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters describing one interactive session.
#[derive(Debug, Default)]
pub struct SessionMetrics {
    actions_scheduled: AtomicU64,
    actions_applied: AtomicU64,
    drains: AtomicU64,
    passes_rendered: AtomicU64,
    tiles_blitted: AtomicU64,
    frames_presented: AtomicU64,
    handshake_timeouts: AtomicU64,
}

impl SessionMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// An action entered the queue.
    pub fn record_scheduled(&self) {
        self.actions_scheduled.fetch_add(1, Ordering::Relaxed);
    }

    /// `count` actions were applied by one drain.
    pub fn record_drain(&self, count: u64) {
        self.drains.fetch_add(1, Ordering::Relaxed);
        self.actions_applied.fetch_add(count, Ordering::Relaxed);
    }

    /// The engine finished sampling a pass.
    pub fn record_pass(&self) {
        self.passes_rendered.fetch_add(1, Ordering::Relaxed);
    }

    /// A tile was written to the display.
    pub fn record_tile(&self) {
        self.tiles_blitted.fetch_add(1, Ordering::Relaxed);
    }

    /// The UI thread acknowledged a frame.
    pub fn record_presented(&self) {
        self.frames_presented.fetch_add(1, Ordering::Relaxed);
    }

    /// The render thread stopped waiting for the UI thread.
    pub fn record_handshake_timeout(&self) {
        self.handshake_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            actions_scheduled: self.actions_scheduled.load(Ordering::Relaxed),
            actions_applied: self.actions_applied.load(Ordering::Relaxed),
            drains: self.drains.load(Ordering::Relaxed),
            passes_rendered: self.passes_rendered.load(Ordering::Relaxed),
            tiles_blitted: self.tiles_blitted.load(Ordering::Relaxed),
            frames_presented: self.frames_presented.load(Ordering::Relaxed),
            handshake_timeouts: self.handshake_timeouts.load(Ordering::Relaxed),
        }
    }

    /// Logs every counter at `info` level.
    pub fn log_summary(&self) {
        let s = self.snapshot();
        log::info!("--- Session Summary ---");
        log::info!(
            "  Actions: {} scheduled, {} applied in {} drain(s)",
            s.actions_scheduled,
            s.actions_applied,
            s.drains
        );
        log::info!(
            "  Passes: {} rendered, {} presented, {} tile(s) blitted",
            s.passes_rendered,
            s.frames_presented,
            s.tiles_blitted
        );
        if s.handshake_timeouts > 0 {
            log::info!("  UI handshake timeouts: {}", s.handshake_timeouts);
        }
        log::info!("-----------------------");
    }
}

/// A plain copy of [`SessionMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Actions entered into the queue.
    pub actions_scheduled: u64,
    /// Actions applied by drains.
    pub actions_applied: u64,
    /// Drains performed.
    pub drains: u64,
    /// Passes sampled by the engine.
    pub passes_rendered: u64,
    /// Tiles written to the display.
    pub tiles_blitted: u64,
    /// Frames acknowledged by the UI thread.
    pub frames_presented: u64,
    /// Frame handshakes abandoned after the timeout.
    pub handshake_timeouts: u64,
}

impl MetricsSnapshot {
    /// Serialises the snapshot to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn drain_counts_actions_and_drains() {
        let metrics = SessionMetrics::new();
        metrics.record_drain(3);
        metrics.record_drain(0);
        let s = metrics.snapshot();
        assert_eq!(s.drains, 2);
        assert_eq!(s.actions_applied, 3);
    }

    #[test]
    fn counters_are_shared_across_threads() {
        let metrics = Arc::new(SessionMetrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..100 {
                        m.record_tile();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(metrics.snapshot().tiles_blitted, 400);
    }

    #[test]
    fn snapshot_serializes() {
        let metrics = SessionMetrics::new();
        metrics.record_pass();
        let json = metrics.snapshot().to_json().unwrap();
        assert!(json.contains("\"passes_rendered\":1"));
    }
}
