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
use seedling_core::scene::MaterialSource;
use std::sync::Arc;

/// Rebuilds named materials from their host sources.
///
/// Each target is removed and rebuilt from scratch; the previous material's
/// shader nodes are discarded, never patched.
pub struct MaterialUpdate {
    updates: Vec<(MaterialSource, String)>,
    scene: SceneHandle,
}

impl MaterialUpdate {
    /// Captures `(source, target material name)` pairs, applied in order.
    pub fn new(scene: &Arc<SceneContext>, updates: Vec<(MaterialSource, String)>) -> Self {
        Self {
            updates,
            scene: scene.handle(),
        }
    }

    /// Captures a single rebuild.
    pub fn single(scene: &Arc<SceneContext>, source: MaterialSource, name: impl Into<String>) -> Self {
        Self::new(scene, vec![(source, name.into())])
    }
}

impl ScheduledAction for MaterialUpdate {
    fn label(&self) -> &'static str {
        "material update"
    }

    fn apply(self: Box<Self>) -> Result<(), ActionError> {
        let context = upgrade(&self.scene)?;
        let mut writer = context.writer()?;

        for (source, name) in &self.updates {
            if writer.project_mut().scene.materials.remove(name).is_some() {
                log::trace!("Discarded previous material '{name}'.");
            }
            let material = writer.translator().build_material(source, name)?;
            writer.project_mut().scene.materials.insert(material);
        }

        log::trace!("Rebuilt {} material(s).", self.updates.len());
        Ok(())
    }
}
