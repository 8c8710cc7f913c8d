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

use super::brackets::draw_bracket;
use seedling_core::display::{DisplaySurface, Rect, Rgba, SharedDisplay};
use seedling_core::frame::{CanvasProperties, Frame};
use seedling_core::renderer::TileCallback;
use seedling_core::DisplayError;
use seedling_telemetry::SessionMetrics;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, MutexGuard};

/// Copies finished tiles and progressive frames onto a [`SharedDisplay`].
///
/// Pixels go through the frame's output colour space on the way. When
/// brackets are enabled, the corners of each tile are outlined as the
/// engine starts it.
pub struct TileBlitter {
    display: SharedDisplay,
    rendered_tiles: AtomicU32,
    bracket_extent: Option<u32>,
    metrics: Arc<SessionMetrics>,
}

impl TileBlitter {
    /// Creates a blitter writing to `display`, without tile brackets.
    pub fn new(display: SharedDisplay, metrics: Arc<SessionMetrics>) -> Self {
        Self {
            display,
            rendered_tiles: AtomicU32::new(0),
            bracket_extent: None,
            metrics,
        }
    }

    /// Outlines the corners of each tile as it begins, `extent` pixels per arm.
    pub fn with_brackets(mut self, extent: u32) -> Self {
        self.bracket_extent = Some(extent);
        self
    }

    /// Number of tiles finished since this blitter was created.
    pub fn rendered_tile_count(&self) -> u32 {
        self.rendered_tiles.load(Ordering::SeqCst)
    }

    /// The counters this blitter reports into.
    pub fn metrics(&self) -> &Arc<SessionMetrics> {
        &self.metrics
    }

    /// The surface pixels are written to.
    pub fn display(&self) -> &SharedDisplay {
        &self.display
    }

    /// Copies every tile of `frame` and refreshes the whole surface.
    pub fn blit_frame(&self, frame: &Frame) -> Result<(), DisplayError> {
        let props = frame.properties();
        let mut surface = self.lock_checked(props)?;

        for tile_y in 0..props.tile_count_y {
            for tile_x in 0..props.tile_count_x {
                blit_tile(&mut *surface, frame, tile_x, tile_y)?;
            }
        }
        surface.refresh();
        Ok(())
    }

    /// Locks the surface and checks it can hold a frame laid out as `props`.
    fn lock_checked(
        &self,
        props: &CanvasProperties,
    ) -> Result<MutexGuard<'_, dyn DisplaySurface + 'static>, DisplayError> {
        let surface = self
            .display
            .lock()
            .map_err(|_| DisplayError::SurfacePoisoned)?;
        check_canvas(props, &*surface)?;
        Ok(surface)
    }
}

impl TileCallback for TileBlitter {
    fn on_tile_begin(&self, frame: &Frame, tile_x: usize, tile_y: usize) -> Result<(), DisplayError> {
        let Some(extent) = self.bracket_extent else {
            return Ok(());
        };
        let props = frame.properties();
        let region = tile_region(props, tile_x, tile_y)?;
        let mut surface = self.lock_checked(props)?;

        draw_bracket(
            &mut *surface,
            region.x as i64,
            region.y as i64,
            region.width as i64,
            region.height as i64,
            i64::from(extent),
            Rgba::WHITE,
        );
        surface.refresh_region(region);
        Ok(())
    }

    fn on_tile_end(&self, frame: &Frame, tile_x: usize, tile_y: usize) -> Result<(), DisplayError> {
        let mut surface = self.lock_checked(frame.properties())?;
        let region = blit_tile(&mut *surface, frame, tile_x, tile_y)?;
        surface.refresh_region(region);
        drop(surface);

        self.rendered_tiles.fetch_add(1, Ordering::SeqCst);
        self.metrics.record_tile();
        Ok(())
    }

    fn on_progressive_frame_end(&self, frame: &Frame) -> Result<(), DisplayError> {
        self.blit_frame(frame)
    }
}

/// Fails unless the surface has the canvas dimensions and channel count.
pub(crate) fn check_canvas(
    props: &CanvasProperties,
    surface: &dyn DisplaySurface,
) -> Result<(), DisplayError> {
    let canvas = (props.canvas_width, props.canvas_height, props.channel_count);
    let display = (surface.width(), surface.height(), surface.channel_count());
    if canvas != display {
        return Err(DisplayError::CanvasMismatch { canvas, display });
    }
    Ok(())
}

fn tile_region(props: &CanvasProperties, tile_x: usize, tile_y: usize) -> Result<Rect, DisplayError> {
    if tile_x >= props.tile_count_x || tile_y >= props.tile_count_y {
        return Err(DisplayError::TileOutOfRange { tile_x, tile_y });
    }
    let (x, y) = props.tile_origin(tile_x, tile_y);
    let (width, height) = props.tile_extent(tile_x, tile_y);
    Ok(Rect::new(x, y, width, height))
}

/// Writes one tile at its canvas position, converted to the output colour
/// space. Returns the region written.
fn blit_tile(
    surface: &mut dyn DisplaySurface,
    frame: &Frame,
    tile_x: usize,
    tile_y: usize,
) -> Result<Rect, DisplayError> {
    let region = tile_region(frame.properties(), tile_x, tile_y)?;
    let tile = frame
        .tile(tile_x, tile_y)
        .ok_or(DisplayError::TileOutOfRange { tile_x, tile_y })?;

    for y in 0..tile.height() {
        for x in 0..tile.width() {
            let color = frame.to_output_color(tile.pixel(x, y));
            surface.put_pixel(region.x + x, region.y + y, color);
        }
    }
    Ok(region)
}
