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

use crate::action::{upgrade, ScheduledAction};
use crate::context::{SceneContext, SceneHandle};
use crate::error::ActionError;
use seedling_core::scene::Camera;
use std::sync::Arc;

/// Replaces the scene's camera.
///
/// Interactive scenes hold a single camera: the collection is cleared and
/// the new camera inserted and made active.
pub struct CameraUpdate {
    camera: Camera,
    scene: SceneHandle,
}

impl CameraUpdate {
    /// Captures `camera` for the scene behind `scene`.
    pub fn new(scene: &Arc<SceneContext>, camera: Camera) -> Self {
        Self {
            camera,
            scene: scene.handle(),
        }
    }
}

impl ScheduledAction for CameraUpdate {
    fn label(&self) -> &'static str {
        "camera update"
    }

    fn apply(self: Box<Self>) -> Result<(), ActionError> {
        let CameraUpdate { camera, scene } = *self;
        let context = upgrade(&scene)?;
        let mut writer = context.writer()?;
        let scene = &mut writer.project_mut().scene;

        let name = camera.name.clone();
        scene.cameras.clear();
        scene.cameras.insert(camera);
        scene.active_camera = Some(name);

        log::trace!("Camera replaced.");
        Ok(())
    }
}
