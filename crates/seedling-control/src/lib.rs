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

//! Coordination between the UI thread editing the scene and the render
//! thread reading it.
//!
//! Edits are captured as [`ScheduledAction`]s, queued on an
//! [`InteractiveRendererController`], and applied in one batch at the start
//! of the engine's next pass, when nothing else is reading the scene.

#![warn(missing_docs)]

pub mod action;
pub mod actions;
pub mod context;
pub mod controller;
pub mod error;

pub use action::ScheduledAction;
pub use actions::{AddInstances, CameraUpdate, MaterialUpdate, RemoveInstances, UpdateInstances};
pub use context::{InstanceLookup, InstanceRef, SceneContext, SceneHandle, SceneWriter};
pub use controller::InteractiveRendererController;
pub use error::ActionError;
