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

//! # Seedling Core
//!
//! Foundational crate containing the render status token, the contracts the
//! progressive render engine is driven through, and the frame and scene data
//! those contracts exchange.

#![warn(missing_docs)]

pub mod display;
pub mod error;
pub mod event;
pub mod frame;
pub mod renderer;
pub mod scene;
pub mod status;

pub use error::{DisplayError, EngineError, SceneError};
pub use status::{AtomicRenderStatus, RenderStatus};
