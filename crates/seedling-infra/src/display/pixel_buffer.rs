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

use anyhow::{Context, Result};
use seedling_core::display::{DisplaySurface, Rect, Rgba};
use std::path::Path;

/// A floating-point RGBA image in memory, usable as a display surface.
///
/// Refreshes are only counted; the host decides when to present the pixels.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    region_refreshes: u64,
    full_refreshes: u64,
}

impl PixelBuffer {
    /// Creates a transparent buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
            region_refreshes: 0,
            full_refreshes: 0,
        }
    }

    /// Reads a pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// All pixels, row by row.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// The pixels as raw bytes, four native-endian `f32` per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of partial refreshes requested so far.
    pub fn region_refreshes(&self) -> u64 {
        self.region_refreshes
    }

    /// Number of full refreshes requested so far.
    pub fn full_refreshes(&self) -> u64 {
        self.full_refreshes
    }

    /// Quantises the buffer to 8-bit RGBA. Values are clamped to `[0, 1]`.
    pub fn to_rgba8(&self) -> Result<image::RgbaImage> {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let raw: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|p| [quantize(p.r), quantize(p.g), quantize(p.b), quantize(p.a)])
            .collect();
        let width = u32::try_from(self.width).context("Buffer too wide for an image")?;
        let height = u32::try_from(self.height).context("Buffer too tall for an image")?;
        image::RgbaImage::from_raw(width, height, raw)
            .context("Pixel count does not match the buffer dimensions")
    }

    /// Writes the buffer to `path` as an 8-bit PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_rgba8()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        log::info!("Saved {}x{} image to '{}'.", self.width, self.height, path.display());
        Ok(())
    }
}

impl DisplaySurface for PixelBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn put_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    fn refresh_region(&mut self, _region: Rect) {
        self.region_refreshes += 1;
    }

    fn refresh(&mut self) {
        self.full_refreshes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.put_pixel(2, 0, Rgba::WHITE);
        buffer.put_pixel(1, 1, Rgba::WHITE);

        assert_eq!(buffer.pixel(1, 1), Some(Rgba::WHITE));
        assert_eq!(buffer.pixel(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(buffer.pixel(2, 0), None);
    }

    #[test]
    fn bytes_view_matches_pixel_layout() {
        let mut buffer = PixelBuffer::new(1, 1);
        buffer.put_pixel(0, 0, Rgba::new(1.0, 0.0, 0.0, 1.0));

        let bytes = buffer.as_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &0.0f32.to_ne_bytes());
    }

    #[test]
    fn quantisation_clamps() {
        let mut buffer = PixelBuffer::new(1, 1);
        buffer.put_pixel(0, 0, Rgba::new(2.0, -1.0, 0.5, 1.0));

        let image = buffer.to_rgba8().unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 128, 255]);
    }

    #[test]
    fn png_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.put_pixel(0, 0, Rgba::WHITE);

        buffer.save_png(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
