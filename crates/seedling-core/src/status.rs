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

//! The status token polled by the render engine on every pass.

use std::sync::atomic::{AtomicU8, Ordering};

/// What the render engine should do at its next decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RenderStatus {
    /// Keep accumulating samples.
    #[default]
    Continue = 0,
    /// Stop rendering and return from the engine's `render` entry point.
    Abort = 1,
    /// Discard accumulated samples and restart from the current scene state.
    Reinitialize = 2,
}

impl RenderStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RenderStatus::Abort,
            2 => RenderStatus::Reinitialize,
            _ => RenderStatus::Continue,
        }
    }
}

/// A [`RenderStatus`] that can be written by the UI thread while the render
/// thread reads it.
///
/// All accesses are `SeqCst`: the frame handshake relies on a status store on
/// one thread being ordered against a status load on the other.
#[derive(Debug, Default)]
pub struct AtomicRenderStatus {
    value: AtomicU8,
}

impl AtomicRenderStatus {
    /// Creates a token holding `status`.
    pub fn new(status: RenderStatus) -> Self {
        Self {
            value: AtomicU8::new(status as u8),
        }
    }

    /// Reads the current status.
    pub fn load(&self) -> RenderStatus {
        RenderStatus::from_u8(self.value.load(Ordering::SeqCst))
    }

    /// Overwrites the current status.
    pub fn store(&self, status: RenderStatus) {
        self.value.store(status as u8, Ordering::SeqCst);
    }

    /// Replaces the status with `new` only if it currently equals `current`.
    ///
    /// Returns the status observed before the call.
    pub fn compare_exchange(&self, current: RenderStatus, new: RenderStatus) -> RenderStatus {
        match self.value.compare_exchange(
            current as u8,
            new as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(previous) | Err(previous) => RenderStatus::from_u8(previous),
        }
    }
}
