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

//! Contracts between a progressive render engine and the code driving it.
//!
//! The engine is a black box that loops passes at its own cadence. It talks
//! to the outside world only through a [`RendererController`], which it polls
//! for a [`RenderStatus`] and notifies at pass boundaries, and through a
//! [`TileCallback`], which it hands pixels to.

use crate::error::{DisplayError, EngineError};
use crate::frame::Frame;
use crate::scene::Project;
use crate::status::RenderStatus;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// The control surface a render engine polls while it renders.
///
/// Every method is called on the render thread. Implementations must let
/// other threads change the status concurrently.
pub trait RendererController: Send + Sync {
    /// What the engine should do next.
    fn status(&self) -> RenderStatus;

    /// Called each time the engine starts accumulating from scratch: once
    /// when `render` is entered and again after every reinitialization.
    ///
    /// This is the one point where the scene may be mutated: no pixel work
    /// is in flight and the engine does not hold the project lock.
    fn on_rendering_begin(&self);

    /// Called when the engine finishes on its own.
    fn on_rendering_success(&self) {}

    /// Called when the engine stops because of an abort or an error.
    fn on_rendering_abort(&self) {}

    /// Called before the engine starts sampling a pass.
    fn on_frame_begin(&self) {}

    /// Called after the engine finished sampling a pass.
    fn on_frame_end(&self) {}
}

/// Receives pixels from the engine.
///
/// Tile hooks may be called from engine worker threads; the frame hook is
/// called on the render thread once per completed pass.
pub trait TileCallback: Send + Sync {
    /// A tile is about to be rendered.
    fn on_tile_begin(
        &self,
        _frame: &Frame,
        _tile_x: usize,
        _tile_y: usize,
    ) -> Result<(), DisplayError> {
        Ok(())
    }

    /// A tile has been rendered.
    fn on_tile_end(&self, _frame: &Frame, _tile_x: usize, _tile_y: usize) -> Result<(), DisplayError> {
        Ok(())
    }

    /// A full progressive pass is available in `frame`.
    fn on_progressive_frame_end(&self, frame: &Frame) -> Result<(), DisplayError>;
}

/// How a call to [`RenderEngine::render`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderOutcome {
    /// The engine reached its own stopping criterion.
    Completed {
        /// Number of passes rendered.
        passes: u64,
    },
    /// The controller asked the engine to stop.
    Aborted {
        /// Number of passes rendered before stopping.
        passes: u64,
    },
}

impl RenderOutcome {
    /// Number of passes rendered, whatever the outcome.
    pub fn passes(&self) -> u64 {
        match self {
            RenderOutcome::Completed { passes } | RenderOutcome::Aborted { passes } => *passes,
        }
    }
}

/// A progressive render engine.
pub trait RenderEngine: Send {
    /// A short name for logs.
    fn name(&self) -> &str;

    /// Renders `project` until the engine decides to stop or the controller
    /// reports [`RenderStatus::Abort`].
    ///
    /// Blocking. When the status turns to [`RenderStatus::Reinitialize`] the
    /// engine discards its accumulated samples, calls
    /// [`RendererController::on_rendering_begin`] and starts over.
    fn render(
        &mut self,
        project: &RwLock<Project>,
        controller: &dyn RendererController,
        tile_callback: &dyn TileCallback,
    ) -> Result<RenderOutcome, EngineError>;
}
