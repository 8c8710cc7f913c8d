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

//! Errors reported by an interactive session.

use seedling_control::ActionError;
use seedling_core::EngineError;
use thiserror::Error;

/// Why a session operation failed, or why a render ended badly.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `start` was called while a render is running.
    #[error("A render is already running in this session")]
    AlreadyRendering,
    /// `end` was called while no render is running.
    #[error("No render is running in this session")]
    NotRendering,
    /// Another session is rendering the same scene context.
    #[error("The scene is already driven by another interactive session")]
    SceneInUse,
    /// The operating system refused to create the render thread.
    #[error("Failed to spawn the render thread: {0}")]
    Spawn(#[source] std::io::Error),
    /// The engine returned an error.
    #[error("The render engine failed: {0}")]
    Engine(#[from] EngineError),
    /// A scheduled scene edit failed and aborted the render.
    #[error("A scheduled scene edit failed: {0}")]
    Action(#[from] ActionError),
    /// The render thread panicked.
    #[error("The render thread panicked")]
    RenderThreadPanicked,
}
