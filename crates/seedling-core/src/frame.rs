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

//! The tiled floating-point frame a render engine produces.

use crate::display::Rgba;
use serde::{Deserialize, Serialize};

/// Geometry of a tiled canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasProperties {
    /// Canvas width in pixels.
    pub canvas_width: usize,
    /// Canvas height in pixels.
    pub canvas_height: usize,
    /// Nominal tile width in pixels. Tiles on the right edge may be narrower.
    pub tile_width: usize,
    /// Nominal tile height in pixels. Tiles on the bottom edge may be shorter.
    pub tile_height: usize,
    /// Number of channels per pixel.
    pub channel_count: usize,
    /// Number of tile columns.
    pub tile_count_x: usize,
    /// Number of tile rows.
    pub tile_count_y: usize,
}

impl CanvasProperties {
    /// Describes a `canvas_width` x `canvas_height` canvas cut into tiles.
    ///
    /// Tile dimensions are clamped to at least one pixel.
    pub fn new(
        canvas_width: usize,
        canvas_height: usize,
        tile_width: usize,
        tile_height: usize,
        channel_count: usize,
    ) -> Self {
        let tile_width = tile_width.max(1);
        let tile_height = tile_height.max(1);
        Self {
            canvas_width,
            canvas_height,
            tile_width,
            tile_height,
            channel_count,
            tile_count_x: canvas_width.div_ceil(tile_width),
            tile_count_y: canvas_height.div_ceil(tile_height),
        }
    }

    /// Total number of tiles.
    pub fn tile_count(&self) -> usize {
        self.tile_count_x * self.tile_count_y
    }

    /// Pixel coordinates of the top-left corner of a tile.
    pub fn tile_origin(&self, tile_x: usize, tile_y: usize) -> (usize, usize) {
        (tile_x * self.tile_width, tile_y * self.tile_height)
    }

    /// Actual dimensions of a tile, accounting for the canvas edges.
    pub fn tile_extent(&self, tile_x: usize, tile_y: usize) -> (usize, usize) {
        let (x, y) = self.tile_origin(tile_x, tile_y);
        (
            self.tile_width.min(self.canvas_width.saturating_sub(x)),
            self.tile_height.min(self.canvas_height.saturating_sub(y)),
        )
    }
}

/// The colour space pixels are converted to before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Pixels are displayed as rendered.
    Linear,
    /// Colour channels are encoded with the sRGB transfer curve.
    #[default]
    Srgb,
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// A rectangular block of floating-point pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    width: usize,
    height: usize,
    channels: usize,
    pixels: Vec<f32>,
}

impl Tile {
    /// Creates a tile filled with zeros.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            pixels: vec![0.0; width * height * channels],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads a pixel. Missing channels read as 0, a missing alpha as 1.
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let base = (y * self.width + x) * self.channels;
        let channel = |i: usize, fallback: f32| {
            if i < self.channels {
                self.pixels[base + i]
            } else {
                fallback
            }
        };
        Rgba::new(channel(0, 0.0), channel(1, 0.0), channel(2, 0.0), channel(3, 1.0))
    }

    /// Writes a pixel, dropping channels the tile does not store.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        let base = (y * self.width + x) * self.channels;
        let values = [color.r, color.g, color.b, color.a];
        for (i, value) in values.iter().take(self.channels).enumerate() {
            self.pixels[base + i] = *value;
        }
    }

    /// Sets every channel of every pixel to zero.
    pub fn clear(&mut self) {
        self.pixels.fill(0.0);
    }
}

/// A full tiled image plus the colour space it is displayed in.
#[derive(Debug, Clone)]
pub struct Frame {
    properties: CanvasProperties,
    color_space: ColorSpace,
    tiles: Vec<Tile>,
}

impl Frame {
    /// Allocates a black frame with the given geometry.
    pub fn new(properties: CanvasProperties, color_space: ColorSpace) -> Self {
        let mut tiles = Vec::with_capacity(properties.tile_count());
        for tile_y in 0..properties.tile_count_y {
            for tile_x in 0..properties.tile_count_x {
                let (w, h) = properties.tile_extent(tile_x, tile_y);
                tiles.push(Tile::new(w, h, properties.channel_count));
            }
        }
        Self {
            properties,
            color_space,
            tiles,
        }
    }

    /// The canvas geometry.
    pub fn properties(&self) -> &CanvasProperties {
        &self.properties
    }

    /// The output colour space.
    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Returns a tile, or `None` when the coordinates are outside the grid.
    pub fn tile(&self, tile_x: usize, tile_y: usize) -> Option<&Tile> {
        if tile_x >= self.properties.tile_count_x || tile_y >= self.properties.tile_count_y {
            return None;
        }
        self.tiles
            .get(tile_y * self.properties.tile_count_x + tile_x)
    }

    /// Mutable access to a tile.
    pub fn tile_mut(&mut self, tile_x: usize, tile_y: usize) -> Option<&mut Tile> {
        if tile_x >= self.properties.tile_count_x || tile_y >= self.properties.tile_count_y {
            return None;
        }
        self.tiles
            .get_mut(tile_y * self.properties.tile_count_x + tile_x)
    }

    /// Converts a rendered colour to the frame's output colour space.
    pub fn to_output_color(&self, color: Rgba) -> Rgba {
        match self.color_space {
            ColorSpace::Linear => color,
            ColorSpace::Srgb => Rgba::new(
                linear_to_srgb(color.r),
                linear_to_srgb(color.g),
                linear_to_srgb(color.b),
                color.a,
            ),
        }
    }

    /// Zeroes every tile.
    pub fn clear(&mut self) {
        for tile in &mut self.tiles {
            tile.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_grid_covers_canvas() {
        let props = CanvasProperties::new(100, 50, 32, 32, 4);
        assert_eq!(props.tile_count_x, 4);
        assert_eq!(props.tile_count_y, 2);
        assert_eq!(props.tile_extent(3, 1), (4, 18));
        assert_eq!(props.tile_origin(3, 1), (96, 32));
    }

    #[test]
    fn frame_tiles_have_edge_sizes() {
        let frame = Frame::new(CanvasProperties::new(10, 10, 4, 4, 4), ColorSpace::Linear);
        let edge = frame.tile(2, 2).expect("edge tile");
        assert_eq!((edge.width(), edge.height()), (2, 2));
        assert!(frame.tile(3, 0).is_none());
    }

    #[test]
    fn pixel_round_trip_and_missing_alpha() {
        let mut tile = Tile::new(2, 2, 3);
        tile.set_pixel(1, 1, Rgba::new(0.25, 0.5, 0.75, 0.1));
        assert_eq!(tile.pixel(1, 1), Rgba::new(0.25, 0.5, 0.75, 1.0));
    }

    #[test]
    fn clear_zeroes_every_tile_and_keeps_the_layout() {
        let mut frame = Frame::new(CanvasProperties::new(6, 6, 4, 4, 4), ColorSpace::Srgb);
        for (tile_x, tile_y) in [(0, 0), (1, 1)] {
            frame
                .tile_mut(tile_x, tile_y)
                .unwrap()
                .set_pixel(1, 1, Rgba::new(0.3, 0.6, 0.9, 1.0));
        }

        frame.clear();

        assert_eq!(frame.color_space(), ColorSpace::Srgb);
        assert_eq!(frame.tile(1, 1).unwrap().width(), 2);
        for (tile_x, tile_y) in [(0, 0), (1, 1)] {
            let tile = frame.tile(tile_x, tile_y).unwrap();
            assert_eq!(tile.pixel(1, 1), Rgba::new(0.0, 0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn srgb_output_leaves_alpha_untouched() {
        let frame = Frame::new(CanvasProperties::new(1, 1, 1, 1, 4), ColorSpace::Srgb);
        let out = frame.to_output_color(Rgba::new(0.0, 1.0, 0.5, 0.5));
        assert_eq!(out.r, 0.0);
        assert!((out.g - 1.0).abs() < 1e-5);
        assert!(out.b > 0.5);
        assert_eq!(out.a, 0.5);
    }
}
