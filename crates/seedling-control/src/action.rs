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

//! The deferred scene mutation contract.

use crate::context::{SceneContext, SceneHandle};
use crate::error::ActionError;
use std::sync::Arc;

/// A single scene edit, captured on the UI thread and applied later on the
/// render thread.
///
/// Everything the edit needs is captured at construction. `apply` consumes
/// the action, so it runs at most once; the controller guarantees it runs
/// exactly once, at the next pass boundary after it was scheduled.
pub trait ScheduledAction: Send {
    /// A short name for logs.
    fn label(&self) -> &'static str;

    /// Performs the edit.
    fn apply(self: Box<Self>) -> Result<(), ActionError>;
}

pub(crate) fn upgrade(handle: &SceneHandle) -> Result<Arc<SceneContext>, ActionError> {
    handle.upgrade().ok_or(ActionError::SceneReleased)
}
