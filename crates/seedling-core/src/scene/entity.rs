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

//! Name-keyed entity collections.

/// Anything stored in a scene collection.
pub trait Entity {
    /// The unique name of the entity within its collection.
    fn name(&self) -> &str;
}

/// An insertion-ordered collection of entities keyed by name.
///
/// Scenes edited interactively hold a handful of entries per collection, so
/// lookups are linear.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMap<T: Entity> {
    entries: Vec<T>,
}

impl<T: Entity> EntityMap<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts an entity, replacing any entity with the same name.
    ///
    /// Returns the replaced entity.
    pub fn insert(&mut self, entity: T) -> Option<T> {
        match self.position(entity.name()) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index], entity)),
            None => {
                self.entries.push(entity);
                None
            }
        }
    }

    /// Removes and returns the entity named `name`.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.position(name).map(|index| self.entries.remove(index))
    }

    /// Returns the entity named `name`.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Returns true if an entity named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Removes every entity.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == name)
    }
}

impl<T: Entity> Default for EntityMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
