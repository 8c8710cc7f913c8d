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

//! Host scene edits and the actions they schedule.

use seedling_control::{
    AddInstances, CameraUpdate, MaterialUpdate, RemoveInstances, SceneContext, ScheduledAction,
    UpdateInstances,
};
use seedling_core::scene::{Camera, MaterialSource, SceneNode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A change made to the host scene while an interactive render runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEdit {
    /// The viewport camera moved or changed.
    CameraChanged(Camera),
    /// Materials were edited: `(new source, target material name)` pairs.
    MaterialsChanged(Vec<(MaterialSource, String)>),
    /// Nodes were added to the host scene.
    NodesCreated(Vec<SceneNode>),
    /// Nodes were deleted from the host scene, by name.
    NodesDeleted(Vec<String>),
    /// Nodes were moved, re-parented or otherwise modified.
    NodesModified(Vec<SceneNode>),
}

impl SceneEdit {
    /// A short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SceneEdit::CameraChanged(_) => "camera changed",
            SceneEdit::MaterialsChanged(_) => "materials changed",
            SceneEdit::NodesCreated(_) => "nodes created",
            SceneEdit::NodesDeleted(_) => "nodes deleted",
            SceneEdit::NodesModified(_) => "nodes modified",
        }
    }

    /// Builds the action that replays this edit on `scene`.
    pub fn into_action(self, scene: &Arc<SceneContext>) -> Box<dyn ScheduledAction> {
        match self {
            SceneEdit::CameraChanged(camera) => Box::new(CameraUpdate::new(scene, camera)),
            SceneEdit::MaterialsChanged(updates) => Box::new(MaterialUpdate::new(scene, updates)),
            SceneEdit::NodesCreated(nodes) => Box::new(AddInstances::new(scene, nodes)),
            SceneEdit::NodesDeleted(names) => Box::new(RemoveInstances::new(scene, names)),
            SceneEdit::NodesModified(nodes) => Box::new(UpdateInstances::new(scene, nodes)),
        }
    }
}
