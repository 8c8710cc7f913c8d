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

//! Contracts for the host-owned surface rendered pixels are shown on.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// A linear floating-point RGBA colour, laid out like the display's pixels.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Opaque white, used for tile brackets.
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    /// Transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a colour from its four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Component-wise `self * factor` on the colour channels.
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor, self.a)
    }
}

/// A pixel rectangle, `[x, x + width) x [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: usize,
    /// Top edge.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Rect {
    /// Creates a rectangle.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A surface the host shows to the user, written from the render thread.
pub trait DisplaySurface: Send {
    /// Width in pixels.
    fn width(&self) -> usize;

    /// Height in pixels.
    fn height(&self) -> usize;

    /// Number of channels per pixel.
    fn channel_count(&self) -> usize {
        4
    }

    /// Writes one pixel. Out-of-bounds writes are ignored.
    fn put_pixel(&mut self, x: usize, y: usize, color: Rgba);

    /// Marks a region as changed so the host can repaint it.
    fn refresh_region(&mut self, region: Rect);

    /// Marks the whole surface as changed.
    fn refresh(&mut self);
}

/// A display surface shared between the render thread and the UI thread.
pub type SharedDisplay = Arc<Mutex<dyn DisplaySurface>>;

/// The host-side object that actually repaints the display window.
///
/// Only ever called on the UI thread, from a task posted by the tile callback.
pub trait DisplayPresenter: Send + Sync {
    /// Whether the host still considers the interactive render active.
    fn is_rendering(&self) -> bool {
        true
    }

    /// Repaints the display from the current surface content.
    fn update_display(&self);
}

/// A presenter for hosts that repaint on their own schedule.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl DisplayPresenter for NullPresenter {
    fn update_display(&self) {}
}
