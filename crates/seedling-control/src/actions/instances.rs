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

//! Instance edits. Each `apply` bumps the assembly version exactly once,
//! however many nodes it touched.

use crate::action::{upgrade, ScheduledAction};
use crate::context::{SceneContext, SceneHandle};
use crate::error::ActionError;
use seedling_core::scene::SceneNode;
use std::sync::Arc;

/// Instantiates new host nodes.
pub struct AddInstances {
    nodes: Vec<SceneNode>,
    scene: SceneHandle,
}

impl AddInstances {
    /// Captures the nodes to instantiate.
    pub fn new(scene: &Arc<SceneContext>, nodes: Vec<SceneNode>) -> Self {
        Self {
            nodes,
            scene: scene.handle(),
        }
    }
}

impl ScheduledAction for AddInstances {
    fn label(&self) -> &'static str {
        "add instances"
    }

    fn apply(self: Box<Self>) -> Result<(), ActionError> {
        let context = upgrade(&self.scene)?;
        let mut writer = context.writer()?;

        for node in &self.nodes {
            writer.add_node(node)?;
        }
        writer.bump_version();

        log::trace!("Added {} instance(s).", self.nodes.len());
        Ok(())
    }
}

/// Removes the instances of host nodes, by node name.
///
/// Names without an instance are ignored: removals can race with earlier ones.
pub struct RemoveInstances {
    nodes: Vec<String>,
    scene: SceneHandle,
}

impl RemoveInstances {
    /// Captures the names of the nodes to remove.
    pub fn new<I, S>(scene: &Arc<SceneContext>, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            scene: scene.handle(),
        }
    }
}

impl ScheduledAction for RemoveInstances {
    fn label(&self) -> &'static str {
        "remove instances"
    }

    fn apply(self: Box<Self>) -> Result<(), ActionError> {
        let context = upgrade(&self.scene)?;
        let mut writer = context.writer()?;

        for node in &self.nodes {
            if !writer.remove_node(node) {
                log::debug!("Node '{node}' has no instance, nothing to remove.");
            }
        }
        writer.bump_version();

        log::trace!("Removed up to {} instance(s).", self.nodes.len());
        Ok(())
    }
}

/// Rebuilds the instances of modified host nodes.
///
/// Instantiated nodes are removed and added again rather than patched.
/// Nodes without an instance are added.
pub struct UpdateInstances {
    nodes: Vec<SceneNode>,
    scene: SceneHandle,
}

impl UpdateInstances {
    /// Captures the modified nodes.
    pub fn new(scene: &Arc<SceneContext>, nodes: Vec<SceneNode>) -> Self {
        Self {
            nodes,
            scene: scene.handle(),
        }
    }
}

impl ScheduledAction for UpdateInstances {
    fn label(&self) -> &'static str {
        "update instances"
    }

    fn apply(self: Box<Self>) -> Result<(), ActionError> {
        let context = upgrade(&self.scene)?;
        let mut writer = context.writer()?;

        for node in &self.nodes {
            if !writer.remove_node(&node.name) {
                log::debug!("Node '{}' was not instantiated, adding it.", node.name);
            }
            writer.add_node(node)?;
        }
        writer.bump_version();

        log::trace!("Rebuilt {} instance(s).", self.nodes.len());
        Ok(())
    }
}
