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

use super::shading::{jitter, SceneSnapshot};
use seedling_core::display::Rgba;
use seedling_core::frame::{CanvasProperties, Frame};
use seedling_core::renderer::{RenderEngine, RenderOutcome, RendererController, TileCallback};
use seedling_core::scene::Project;
use seedling_core::{DisplayError, EngineError, RenderStatus};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::thread;
use std::time::Duration;

/// Tuning of a [`ProgressiveEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Passes accumulated before the engine stops on its own. `None`
    /// renders until aborted.
    pub max_passes: Option<u32>,
    /// Pause between two passes, in milliseconds.
    pub pass_delay_ms: u64,
    /// Poll the controller before each tile rather than only between passes.
    pub abort_check_per_tile: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_passes: None,
            pass_delay_ms: 0,
            abort_check_per_tile: true,
        }
    }
}

/// Running sum of the samples taken for every pixel.
struct Accumulator {
    sums: Vec<Rgba>,
    width: usize,
    samples: u32,
}

impl Accumulator {
    fn new(props: &CanvasProperties) -> Self {
        Self {
            sums: vec![Rgba::TRANSPARENT; props.canvas_width * props.canvas_height],
            width: props.canvas_width,
            samples: 0,
        }
    }

    /// Adds a sample at `(x, y)` and returns the new mean.
    fn add(&mut self, x: usize, y: usize, sample: Rgba) -> Rgba {
        let sum = &mut self.sums[y * self.width + x];
        sum.r += sample.r;
        sum.g += sample.g;
        sum.b += sample.b;
        sum.a += sample.a;
        let n = (self.samples + 1) as f32;
        Rgba::new(sum.r / n, sum.g / n, sum.b / n, sum.a / n)
    }
}

/// A headless progressive renderer.
///
/// Each pass takes one jittered sample per pixel, tile by tile in row-major
/// order, and averages it into the frame. The scene is copied out of the
/// project lock each time accumulation (re)starts, so the lock is only held
/// for that copy.
#[derive(Debug, Clone, Default)]
pub struct ProgressiveEngine {
    settings: EngineSettings,
}

impl ProgressiveEngine {
    /// Creates an engine with the given tuning.
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// The engine's tuning.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn render_loop(
        &self,
        project: &RwLock<Project>,
        controller: &dyn RendererController,
        tile_callback: &dyn TileCallback,
        passes: &mut u64,
    ) -> Result<RenderOutcome, EngineError> {
        let mut previous: Option<Frame> = None;
        'restart: loop {
            controller.on_rendering_begin();

            let (snapshot, mut frame) = {
                let project = project.read().map_err(|_| EngineError::ProjectPoisoned)?;
                let snapshot = SceneSnapshot::capture(&project)?;
                let frame = match previous.take() {
                    Some(mut frame)
                        if *frame.properties() == project.canvas
                            && frame.color_space() == project.color_space =>
                    {
                        frame.clear();
                        frame
                    }
                    _ => Frame::new(project.canvas, project.color_space),
                };
                (snapshot, frame)
            };
            let mut accumulator = Accumulator::new(frame.properties());
            log::debug!(
                "Accumulation started on a {}x{} canvas.",
                frame.properties().canvas_width,
                frame.properties().canvas_height
            );

            loop {
                match controller.status() {
                    RenderStatus::Abort => {
                        controller.on_rendering_abort();
                        return Ok(RenderOutcome::Aborted { passes: *passes });
                    }
                    RenderStatus::Reinitialize => {
                        log::debug!(
                            "Reinitializing after {} accumulated pass(es).",
                            accumulator.samples
                        );
                        previous = Some(frame);
                        continue 'restart;
                    }
                    RenderStatus::Continue => {}
                }

                if self
                    .settings
                    .max_passes
                    .is_some_and(|max| accumulator.samples >= max)
                {
                    controller.on_rendering_success();
                    return Ok(RenderOutcome::Completed { passes: *passes });
                }

                controller.on_frame_begin();
                if !self.render_pass(
                    &snapshot,
                    &mut accumulator,
                    &mut frame,
                    controller,
                    tile_callback,
                )? {
                    continue;
                }
                controller.on_frame_end();
                tile_callback.on_progressive_frame_end(&frame)?;
                *passes += 1;

                if self.settings.pass_delay_ms > 0 {
                    thread::sleep(Duration::from_millis(self.settings.pass_delay_ms));
                }
            }
        }
    }

    /// Samples every tile once. Returns `false` if the controller left
    /// `Continue` before the pass was complete.
    fn render_pass(
        &self,
        snapshot: &SceneSnapshot,
        accumulator: &mut Accumulator,
        frame: &mut Frame,
        controller: &dyn RendererController,
        tile_callback: &dyn TileCallback,
    ) -> Result<bool, EngineError> {
        let props = *frame.properties();
        for tile_y in 0..props.tile_count_y {
            for tile_x in 0..props.tile_count_x {
                if self.settings.abort_check_per_tile && controller.status() != RenderStatus::Continue {
                    return Ok(false);
                }
                tile_callback.on_tile_begin(frame, tile_x, tile_y)?;
                sample_tile(snapshot, accumulator, frame, tile_x, tile_y)?;
                tile_callback.on_tile_end(frame, tile_x, tile_y)?;
            }
        }
        accumulator.samples += 1;
        Ok(true)
    }
}

fn sample_tile(
    snapshot: &SceneSnapshot,
    accumulator: &mut Accumulator,
    frame: &mut Frame,
    tile_x: usize,
    tile_y: usize,
) -> Result<(), DisplayError> {
    let props = *frame.properties();
    let (origin_x, origin_y) = props.tile_origin(tile_x, tile_y);
    let width = props.canvas_width.max(1) as f32;
    let height = props.canvas_height.max(1) as f32;
    let aspect = width / height;
    let pass = accumulator.samples;

    let tile = frame
        .tile_mut(tile_x, tile_y)
        .ok_or(DisplayError::TileOutOfRange { tile_x, tile_y })?;
    for y in 0..tile.height() {
        for x in 0..tile.width() {
            let (px, py) = (origin_x + x, origin_y + y);
            let (jx, jy) = jitter(pass, px as u32, py as u32);
            let u = ((px as f32 + jx) / width * 2.0 - 1.0) * aspect;
            let v = 1.0 - (py as f32 + jy) / height * 2.0;
            let mean = accumulator.add(px, py, snapshot.shade(u, v));
            tile.set_pixel(x, y, mean);
        }
    }
    Ok(())
}

impl RenderEngine for ProgressiveEngine {
    fn name(&self) -> &str {
        "progressive"
    }

    fn render(
        &mut self,
        project: &RwLock<Project>,
        controller: &dyn RendererController,
        tile_callback: &dyn TileCallback,
    ) -> Result<RenderOutcome, EngineError> {
        let mut passes = 0;
        let result = self.render_loop(project, controller, tile_callback, &mut passes);
        match &result {
            Ok(outcome) => log::info!("Engine '{}' stopped: {outcome:?}.", self.name()),
            Err(e) => {
                log::error!("Engine '{}' failed after {passes} pass(es): {e}", self.name());
                controller.on_rendering_abort();
            }
        }
        result
    }
}
