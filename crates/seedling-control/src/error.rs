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

//! Errors raised while applying scheduled actions.

use seedling_core::SceneError;
use thiserror::Error;

/// Why a scheduled action could not be applied.
///
/// Any of these is fatal to the interactive session that scheduled it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    /// The scene context the action targets no longer exists.
    #[error("The scene context was released before the action could run")]
    SceneReleased,
    /// The scene rejected the mutation.
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    /// A scene lock was poisoned by a panicking thread.
    #[error("The {0} lock is poisoned")]
    Poisoned(&'static str),
}
