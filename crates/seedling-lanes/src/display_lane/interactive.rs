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

use super::tile_blitter::TileBlitter;
use crossbeam_channel::RecvTimeoutError;
use seedling_core::display::DisplayPresenter;
use seedling_core::event::UiPoster;
use seedling_core::frame::Frame;
use seedling_core::renderer::{RendererController, TileCallback};
use seedling_core::{DisplayError, RenderStatus};
use std::sync::Arc;
use std::time::Duration;

/// The tile callback of an interactive session.
///
/// Blits like [`TileBlitter`], then at the end of each progressive pass asks
/// the UI thread to repaint and waits for it, so the render thread never
/// outruns the display. The wait is skipped when the session is not in
/// [`RenderStatus::Continue`], and bounded by the handshake timeout when one
/// is set.
pub struct InteractiveTileCallback {
    blitter: TileBlitter,
    controller: Arc<dyn RendererController>,
    poster: UiPoster,
    presenter: Arc<dyn DisplayPresenter>,
    handshake_timeout: Option<Duration>,
}

impl InteractiveTileCallback {
    /// Wraps `blitter`. Repaint tasks are posted through `poster` and call
    /// `presenter` on the UI thread.
    pub fn new(
        blitter: TileBlitter,
        controller: Arc<dyn RendererController>,
        poster: UiPoster,
        presenter: Arc<dyn DisplayPresenter>,
    ) -> Self {
        Self {
            blitter,
            controller,
            poster,
            presenter,
            handshake_timeout: None,
        }
    }

    /// Gives up waiting for the UI thread after `timeout`. `None` waits forever.
    pub fn with_handshake_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// The wrapped blitter.
    pub fn blitter(&self) -> &TileBlitter {
        &self.blitter
    }

    fn wait_for_ui(&self, done: &crossbeam_channel::Receiver<()>) {
        let Some(timeout) = self.handshake_timeout else {
            if done.recv().is_err() {
                log::debug!("Repaint task dropped before running.");
            }
            return;
        };

        match done.recv_timeout(timeout) {
            Ok(()) => {}
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(
                    "UI thread did not repaint within {} ms, resuming rendering.",
                    timeout.as_millis()
                );
                self.blitter.metrics().record_handshake_timeout();
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::debug!("Repaint task dropped before running.");
            }
        }
    }
}

impl TileCallback for InteractiveTileCallback {
    fn on_tile_begin(&self, frame: &Frame, tile_x: usize, tile_y: usize) -> Result<(), DisplayError> {
        self.blitter.on_tile_begin(frame, tile_x, tile_y)
    }

    fn on_tile_end(&self, frame: &Frame, tile_x: usize, tile_y: usize) -> Result<(), DisplayError> {
        self.blitter.on_tile_end(frame, tile_x, tile_y)
    }

    fn on_progressive_frame_end(&self, frame: &Frame) -> Result<(), DisplayError> {
        self.blitter.on_progressive_frame_end(frame)?;

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let presenter = Arc::clone(&self.presenter);
        let metrics = Arc::clone(self.blitter.metrics());
        let posted = self.poster.post(move || {
            if presenter.is_rendering() {
                presenter.update_display();
            }
            metrics.record_presented();
            let _ = done_tx.send(());
        });
        if !posted {
            return Ok(());
        }

        // Checked after posting: an abort raised from here on is seen by
        // whoever tears the session down, and that caller pumps the UI queue.
        let status = self.controller.status();
        if status != RenderStatus::Continue {
            log::trace!("Not waiting for the repaint, status is {status:?}.");
            return Ok(());
        }
        self.wait_for_ui(&done_rx);
        Ok(())
    }
}
