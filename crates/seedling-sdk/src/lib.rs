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

//! The public-facing API for hosting interactive renders.
//!
//! A host wraps its scene in a [`SceneContext`](seedling_control::SceneContext),
//! creates an [`InteractiveSession`] over a display surface, starts it with a
//! render engine and then, from its UI thread, forwards edits with
//! [`InteractiveSession::apply_edit`] and pumps repaint tasks with
//! [`InteractiveSession::pump_ui`].

#![warn(missing_docs)]

pub mod config;
pub mod edit;
pub mod error;
pub mod session;

pub use config::SessionConfig;
pub use edit::SceneEdit;
pub use error::SessionError;
pub use session::{InteractiveSession, SessionReport};

/// Re-exports of the types a host needs to drive a session.
pub mod prelude {
    pub use crate::{InteractiveSession, SceneEdit, SessionConfig, SessionError, SessionReport};
    pub use seedling_control::{
        AddInstances, CameraUpdate, MaterialUpdate, RemoveInstances, SceneContext,
        ScheduledAction, UpdateInstances,
    };
    pub use seedling_core::display::{
        DisplayPresenter, DisplaySurface, NullPresenter, Rgba, SharedDisplay,
    };
    pub use seedling_core::frame::{CanvasProperties, ColorSpace};
    pub use seedling_core::renderer::{RenderEngine, RenderOutcome};
    pub use seedling_core::scene::{
        Camera, MaterialSource, NodeKind, Project, SceneNode, SceneTranslator, Transform,
    };
    pub use seedling_core::RenderStatus;
    pub use seedling_infra::{BasicSceneTranslator, EngineSettings, PixelBuffer, ProgressiveEngine};
    pub use seedling_telemetry::MetricsSnapshot;
}
