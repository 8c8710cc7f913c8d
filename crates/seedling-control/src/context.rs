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

//! The live scene shared by the render engine and the scheduled actions.

use crate::error::ActionError;
use seedling_core::scene::{Project, SceneNode, SceneTranslator, TranslatedInstance};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};

/// A non-owning handle scheduled actions keep to the scene they edit.
pub type SceneHandle = Weak<SceneContext>;

/// The renderer instance a host node currently maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceRef {
    /// Name of an object instance.
    Object(String),
    /// Name of an assembly instance.
    Assembly(String),
}

/// Node name → instance name tables, one per instance kind.
#[derive(Debug, Default)]
pub struct InstanceLookup {
    objects: HashMap<String, String>,
    assemblies: HashMap<String, String>,
}

impl InstanceLookup {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `node` is rendered through the object instance `instance`.
    pub fn insert_object(&mut self, node: String, instance: String) {
        self.objects.insert(node, instance);
    }

    /// Records that `node` is rendered through the assembly instance `instance`.
    pub fn insert_assembly(&mut self, node: String, instance: String) {
        self.assemblies.insert(node, instance);
    }

    /// Looks `node` up in the object table, then the assembly table.
    pub fn get(&self, node: &str) -> Option<InstanceRef> {
        if let Some(name) = self.objects.get(node) {
            return Some(InstanceRef::Object(name.clone()));
        }
        self.assemblies
            .get(node)
            .map(|name| InstanceRef::Assembly(name.clone()))
    }

    /// Drops the entry for `node`, searching the object table first.
    pub fn remove(&mut self, node: &str) -> Option<InstanceRef> {
        if let Some(name) = self.objects.remove(node) {
            return Some(InstanceRef::Object(name));
        }
        self.assemblies.remove(node).map(InstanceRef::Assembly)
    }

    /// Returns true if `node` is in either table.
    pub fn contains(&self, node: &str) -> bool {
        self.objects.contains_key(node) || self.assemblies.contains_key(node)
    }

    /// Total number of mapped nodes.
    pub fn len(&self) -> usize {
        self.objects.len() + self.assemblies.len()
    }

    /// Returns true if no node is mapped.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The project being rendered, the lookup tables tying host nodes to its
/// instances, and the translator used to rebuild entities.
///
/// Mutated only on the render thread, between passes. UI-thread queries take
/// the same locks. Locks are always taken project first, lookup second.
pub struct SceneContext {
    project: RwLock<Project>,
    lookup: Mutex<InstanceLookup>,
    translator: Arc<dyn SceneTranslator>,
    bound: AtomicBool,
}

impl SceneContext {
    /// Wraps a project for interactive editing.
    pub fn new(project: Project, translator: Arc<dyn SceneTranslator>) -> Arc<Self> {
        Arc::new(Self {
            project: RwLock::new(project),
            lookup: Mutex::new(InstanceLookup::new()),
            translator,
            bound: AtomicBool::new(false),
        })
    }

    /// Returns a weak handle for scheduled actions.
    pub fn handle(self: &Arc<Self>) -> SceneHandle {
        Arc::downgrade(self)
    }

    /// The project lock, as handed to the render engine.
    pub fn project(&self) -> &RwLock<Project> {
        &self.project
    }

    /// Read access to the project.
    pub fn read_project(&self) -> Result<RwLockReadGuard<'_, Project>, ActionError> {
        self.project.read().map_err(|_| ActionError::Poisoned("project"))
    }

    /// The translation layer.
    pub fn translator(&self) -> &dyn SceneTranslator {
        self.translator.as_ref()
    }

    /// Locks the project and the lookup tables for editing.
    pub fn writer(&self) -> Result<SceneWriter<'_>, ActionError> {
        let project = self
            .project
            .write()
            .map_err(|_| ActionError::Poisoned("project"))?;
        let lookup = self
            .lookup
            .lock()
            .map_err(|_| ActionError::Poisoned("instance lookup"))?;
        Ok(SceneWriter {
            project,
            lookup,
            translator: self.translator.as_ref(),
        })
    }

    /// Returns true if `node` currently has a renderer instance.
    pub fn is_instantiated(&self, node: &str) -> bool {
        self.read_lookup().contains(node)
    }

    /// Returns the instance `node` maps to, if any.
    pub fn instance_of(&self, node: &str) -> Option<InstanceRef> {
        self.read_lookup().get(node)
    }

    /// Locks the lookup tables for a query.
    fn read_lookup(&self) -> MutexGuard<'_, InstanceLookup> {
        // Every table update is a single map insert or remove, which a panic
        // cannot leave half-written.
        self.lookup.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Instantiates the initial set of nodes before a session starts.
    pub fn populate(&self, nodes: &[SceneNode]) -> Result<(), ActionError> {
        let mut writer = self.writer()?;
        for node in nodes {
            writer.add_node(node)?;
        }
        writer.bump_version();
        log::debug!("Scene context populated with {} node(s).", nodes.len());
        Ok(())
    }

    /// Marks the context as driven by a session.
    ///
    /// Returns `false` if another session already holds it.
    pub fn try_bind(&self) -> bool {
        self.bound
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Releases the context from its session.
    pub fn unbind(&self) {
        self.bound.store(false, Ordering::SeqCst);
    }
}

/// Exclusive access to the scene while a batch of edits is applied.
pub struct SceneWriter<'a> {
    project: RwLockWriteGuard<'a, Project>,
    lookup: MutexGuard<'a, InstanceLookup>,
    translator: &'a dyn SceneTranslator,
}

impl SceneWriter<'_> {
    /// The project being edited.
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    /// The translation layer.
    pub fn translator(&self) -> &dyn SceneTranslator {
        self.translator
    }

    /// Builds the instance for `node` and registers it.
    ///
    /// A node that already has an instance is replaced.
    pub fn add_node(&mut self, node: &SceneNode) -> Result<(), ActionError> {
        if self.lookup.contains(&node.name) {
            log::trace!("Node '{}' already instantiated, replacing it.", node.name);
            self.remove_node(&node.name);
        }

        let assembly = &mut self.project.scene.assembly;
        match self.translator.build_instance(node)? {
            TranslatedInstance::Object(instance) => {
                let name = instance.name.clone();
                assembly.object_instances.insert(instance);
                self.lookup.insert_object(node.name.clone(), name);
            }
            TranslatedInstance::Assembly(instance) => {
                let name = instance.name.clone();
                assembly.assembly_instances.insert(instance);
                self.lookup.insert_assembly(node.name.clone(), name);
            }
        }
        Ok(())
    }

    /// Removes the instance of the node named `node`.
    ///
    /// Returns `false` if the node had no instance.
    pub fn remove_node(&mut self, node: &str) -> bool {
        let assembly = &mut self.project.scene.assembly;
        match self.lookup.remove(node) {
            Some(InstanceRef::Object(name)) => {
                assembly.object_instances.remove(&name);
                true
            }
            Some(InstanceRef::Assembly(name)) => {
                assembly.assembly_instances.remove(&name);
                true
            }
            None => false,
        }
    }

    /// Returns true if `node` has an instance.
    pub fn is_instantiated(&self, node: &str) -> bool {
        self.lookup.contains(node)
    }

    /// Signals that the instance set changed.
    pub fn bump_version(&mut self) {
        self.project.scene.assembly.bump_version_id();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_searches_objects_before_assemblies() {
        let mut lookup = InstanceLookup::new();
        lookup.insert_assembly("n".into(), "asm_inst".into());
        lookup.insert_object("n".into(), "obj_inst".into());

        assert_eq!(lookup.get("n"), Some(InstanceRef::Object("obj_inst".into())));
        assert_eq!(lookup.remove("n"), Some(InstanceRef::Object("obj_inst".into())));
        assert_eq!(lookup.remove("n"), Some(InstanceRef::Assembly("asm_inst".into())));
        assert_eq!(lookup.remove("n"), None);
        assert!(lookup.is_empty());
    }
}
