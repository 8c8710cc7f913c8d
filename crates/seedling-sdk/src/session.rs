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

//! The interactive render session.

use crate::config::SessionConfig;
use crate::edit::SceneEdit;
use crate::error::SessionError;
use seedling_control::{InteractiveRendererController, SceneContext, ScheduledAction};
use seedling_core::display::{DisplayPresenter, SharedDisplay};
use seedling_core::event::UiQueue;
use seedling_core::renderer::{RenderEngine, RenderOutcome, RendererController};
use seedling_core::{EngineError, RenderStatus};
use seedling_lanes::{InteractiveTileCallback, TileBlitter};
use seedling_telemetry::{MetricsSnapshot, SessionMetrics};
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// What a finished render produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    /// Name of the engine that rendered.
    pub engine: String,
    /// How the engine stopped, with the number of passes it rendered.
    pub outcome: RenderOutcome,
    /// Wall time between `start` and `end`.
    pub elapsed: Duration,
    /// Session counters, cumulated since the session was created.
    pub metrics: MetricsSnapshot,
}

impl SessionReport {
    /// Serialises the report to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

struct RenderThread {
    engine: String,
    started: Instant,
    handle: JoinHandle<Result<RenderOutcome, EngineError>>,
}

/// Runs a progressive render on a background thread while the host keeps
/// editing the scene from its UI thread.
///
/// Edits are queued on the session's controller and applied by the render
/// thread whenever the engine (re)starts accumulation. After each pass the
/// render thread posts a repaint task and waits until the host runs it with
/// [`pump_ui`](Self::pump_ui), so the host must pump regularly while a render
/// is running.
///
/// A session can render several times in a row, one render at a time.
/// Dropping a rendering session ends the render first.
pub struct InteractiveSession {
    config: SessionConfig,
    scene: Arc<SceneContext>,
    display: SharedDisplay,
    presenter: Arc<dyn DisplayPresenter>,
    controller: Arc<InteractiveRendererController>,
    metrics: Arc<SessionMetrics>,
    ui_queue: UiQueue,
    render_thread: Option<RenderThread>,
}

impl InteractiveSession {
    /// Creates an idle session rendering `scene` onto `display`.
    ///
    /// The display must have the dimensions of the project's canvas.
    pub fn new(
        scene: Arc<SceneContext>,
        display: SharedDisplay,
        presenter: Arc<dyn DisplayPresenter>,
        config: SessionConfig,
    ) -> Self {
        let metrics = Arc::new(SessionMetrics::new());
        Self {
            config,
            scene,
            display,
            presenter,
            controller: Arc::new(InteractiveRendererController::with_metrics(Arc::clone(
                &metrics,
            ))),
            metrics,
            ui_queue: UiQueue::new(),
            render_thread: None,
        }
    }

    /// Starts rendering with `engine` on a new render thread.
    pub fn start<E>(&mut self, mut engine: E) -> Result<(), SessionError>
    where
        E: RenderEngine + 'static,
    {
        if self.render_thread.is_some() {
            return Err(SessionError::AlreadyRendering);
        }
        if !self.scene.try_bind() {
            return Err(SessionError::SceneInUse);
        }

        // A previous render leaves the status at Abort.
        self.controller.set_status(RenderStatus::Continue);

        let mut blitter = TileBlitter::new(Arc::clone(&self.display), Arc::clone(&self.metrics));
        if self.config.draw_tile_brackets {
            blitter = blitter.with_brackets(self.config.bracket_extent);
        }
        let controller: Arc<dyn RendererController> = self.controller.clone();
        let tile_callback = InteractiveTileCallback::new(
            blitter,
            Arc::clone(&controller),
            self.ui_queue.poster(),
            Arc::clone(&self.presenter),
        )
        .with_handshake_timeout(self.config.handshake_timeout());

        let scene = Arc::clone(&self.scene);
        let engine_name = engine.name().to_string();
        let spawned = thread::Builder::new()
            .name(self.config.render_thread_name.clone())
            .spawn(move || {
                log::info!("Render thread started.");
                let result = engine.render(scene.project(), controller.as_ref(), &tile_callback);
                log::info!("Render thread exiting.");
                result
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.scene.unbind();
                return Err(SessionError::Spawn(e));
            }
        };

        log::info!("Interactive render started with engine '{engine_name}'.");
        self.render_thread = Some(RenderThread {
            engine: engine_name,
            started: Instant::now(),
            handle,
        });
        Ok(())
    }

    /// Queues `action`. The controller asks the engine to restart
    /// accumulation, so the edit shows up at the next pass boundary.
    pub fn schedule(&self, action: Box<dyn ScheduledAction>) {
        self.controller.schedule(action);
    }

    /// Schedules the action replaying a host edit.
    pub fn apply_edit(&self, edit: SceneEdit) {
        log::debug!("Host edit: {}.", edit.kind());
        self.schedule(edit.into_action(&self.scene));
    }

    /// Asks the engine to stop. The render thread keeps running until the
    /// engine notices; [`end`](Self::end) collects it.
    pub fn request_abort(&self) {
        self.controller.request_abort();
    }

    /// Asks the engine to restart accumulation from the current scene.
    pub fn request_reinitialize(&self) {
        self.controller.request_reinitialize();
    }

    /// Runs the repaint tasks posted by the render thread. Call from the UI
    /// thread.
    ///
    /// ## Returns
    /// The number of tasks run.
    pub fn pump_ui(&self) -> usize {
        self.ui_queue.pump()
    }

    /// Like [`pump_ui`](Self::pump_ui), but waits up to `timeout` for a task.
    pub fn pump_ui_timeout(&self, timeout: Duration) -> usize {
        self.ui_queue.pump_timeout(timeout)
    }

    /// Number of repaint tasks waiting for [`pump_ui`](Self::pump_ui).
    pub fn pending_ui_tasks(&self) -> usize {
        self.ui_queue.pending()
    }

    /// Stops the render and waits for the render thread.
    ///
    /// Keeps pumping the UI queue while waiting, so a render thread blocked
    /// on a repaint handshake is always released.
    pub fn end(&mut self) -> Result<SessionReport, SessionError> {
        let RenderThread {
            engine,
            started,
            handle,
        } = self.render_thread.take().ok_or(SessionError::NotRendering)?;

        self.controller.request_abort();
        let interval = self.config.ui_pump_interval();
        while !handle.is_finished() {
            self.ui_queue.pump_timeout(interval);
        }
        let joined = handle.join();
        self.ui_queue.pump();
        self.scene.unbind();

        let failure = self.controller.take_failure();
        self.metrics.log_summary();

        let outcome = match joined {
            Err(_) => return Err(SessionError::RenderThreadPanicked),
            Ok(Err(e)) => return Err(SessionError::Engine(e)),
            Ok(Ok(outcome)) => outcome,
        };
        if let Some(e) = failure {
            return Err(SessionError::Action(e));
        }

        log::info!("Interactive render ended: {outcome:?}.");
        Ok(SessionReport {
            engine,
            outcome,
            elapsed: started.elapsed(),
            metrics: self.metrics.snapshot(),
        })
    }

    /// Returns true between `start` and `end`.
    pub fn is_rendering(&self) -> bool {
        self.render_thread.is_some()
    }

    /// Returns true once the render thread has exited on its own, because
    /// the engine completed or failed. [`end`](Self::end) still has to be
    /// called to collect the result.
    pub fn render_finished(&self) -> bool {
        self.render_thread
            .as_ref()
            .is_some_and(|thread| thread.handle.is_finished())
    }

    /// The status the engine currently sees.
    pub fn status(&self) -> RenderStatus {
        self.controller.status()
    }

    /// The scene being rendered.
    pub fn scene(&self) -> &Arc<SceneContext> {
        &self.scene
    }

    /// The surface pixels are written to.
    pub fn display(&self) -> &SharedDisplay {
        &self.display
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Copies the session counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Drop for InteractiveSession {
    fn drop(&mut self) {
        if self.render_thread.is_some() {
            if let Err(e) = self.end() {
                log::error!("Interactive render ended with an error: {e}");
            }
        }
    }
}
