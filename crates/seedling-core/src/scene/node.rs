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

//! Host-side scene data and the translation layer that turns it into
//! renderer entities.

use super::model::{AssemblyInstance, Material, ObjectInstance, Transform};
use crate::display::Rgba;
use crate::error::SceneError;
use serde::{Deserialize, Serialize};

/// How the translation layer classified a host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A single piece of geometry.
    Geometry,
    /// A group rendered as a nested assembly.
    Group,
}

/// A snapshot of a host scene node, taken on the UI thread when it was edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Unique node name; keys the instance lookup tables.
    pub name: String,
    /// Classification.
    pub kind: NodeKind,
    /// World placement.
    pub transform: Transform,
    /// Name of the bound material, if any.
    pub material: Option<String>,
}

impl SceneNode {
    /// A geometry node at the identity transform.
    pub fn geometry(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Geometry,
            transform: Transform::IDENTITY,
            material: None,
        }
    }

    /// A group node at the identity transform.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Group,
            transform: Transform::IDENTITY,
            material: None,
        }
    }

    /// Sets the placement.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Binds a material.
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }
}

/// A snapshot of a host material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSource {
    /// Stable identity of the host material.
    pub id: u64,
    /// Diffuse colour.
    pub base_color: Rgba,
    /// Emitted radiance scale.
    pub emission: f32,
}

impl MaterialSource {
    /// A non-emissive material.
    pub fn new(id: u64, base_color: Rgba) -> Self {
        Self {
            id,
            base_color,
            emission: 0.0,
        }
    }
}

/// The renderer instance a node translates to.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslatedInstance {
    /// Geometry placement.
    Object(ObjectInstance),
    /// Nested assembly placement.
    Assembly(AssemblyInstance),
}

/// Builds renderer entities from host data.
///
/// Called on the render thread while scheduled actions are applied.
pub trait SceneTranslator: Send + Sync {
    /// Builds a fresh material named `name` from `source`.
    fn build_material(&self, source: &MaterialSource, name: &str) -> Result<Material, SceneError>;

    /// Builds the instance placing `node` in the scene.
    fn build_instance(&self, node: &SceneNode) -> Result<TranslatedInstance, SceneError>;
}
