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

//! The renderer-side scene: cameras, materials and instances.

use super::entity::{Entity, EntityMap};
use crate::display::Rgba;
use crate::error::SceneError;
use crate::frame::{CanvasProperties, ColorSpace};
use serde::{Deserialize, Serialize};

/// A placement in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World-space translation.
    pub translation: [f32; 3],
    /// Uniform scale.
    pub scale: f32,
}

impl Transform {
    /// The identity placement.
    pub const IDENTITY: Transform = Transform {
        translation: [0.0; 3],
        scale: 1.0,
    };

    /// A pure translation.
    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            scale: 1.0,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A pinhole camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Entity name.
    pub name: String,
    /// Camera-to-world placement.
    pub transform: Transform,
    /// Horizontal field of view in degrees.
    pub fov_degrees: f32,
}

impl Camera {
    /// A camera at `transform` with a 45 degree field of view.
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            fov_degrees: 45.0,
        }
    }
}

impl Entity for Camera {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A surface material and the shader nodes it was compiled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Entity name.
    pub name: String,
    /// Identity of the host material this was built from.
    pub source_id: u64,
    /// Diffuse colour.
    pub base_color: Rgba,
    /// Emitted radiance scale.
    pub emission: f32,
    /// Names of the shader-group nodes making up the material.
    pub shader_nodes: Vec<String>,
}

impl Entity for Material {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A placement of a geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInstance {
    /// Entity name.
    pub name: String,
    /// Name of the instantiated object.
    pub object: String,
    /// Placement.
    pub transform: Transform,
    /// Bound material, if any.
    pub material: Option<String>,
}

impl Entity for ObjectInstance {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A placement of a grouped sub-scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyInstance {
    /// Entity name.
    pub name: String,
    /// Name of the instantiated assembly.
    pub assembly: String,
    /// Placement.
    pub transform: Transform,
}

impl Entity for AssemblyInstance {
    fn name(&self) -> &str {
        &self.name
    }
}

/// The container instances live in.
///
/// `version_id` is bumped whenever the set of instances changes so the engine
/// knows its acceleration structures are stale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assembly {
    /// Entity name.
    pub name: String,
    /// Geometry placements.
    pub object_instances: EntityMap<ObjectInstance>,
    /// Sub-scene placements.
    pub assembly_instances: EntityMap<AssemblyInstance>,
    version_id: u64,
}

impl Assembly {
    /// An empty assembly.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The current version.
    pub fn version_id(&self) -> u64 {
        self.version_id
    }

    /// Marks the instance set as changed.
    pub fn bump_version_id(&mut self) {
        self.version_id += 1;
    }
}

/// Cameras, materials and the instance assembly of one project.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Camera collection. Interactive sessions keep exactly one camera.
    pub cameras: EntityMap<Camera>,
    /// Name of the camera the engine renders through.
    pub active_camera: Option<String>,
    /// Material table.
    pub materials: EntityMap<Material>,
    /// Instance container.
    pub assembly: Assembly,
    /// Colour of pixels no instance covers.
    pub background: Rgba,
}

impl Scene {
    /// An empty scene with a black background.
    pub fn new() -> Self {
        Self {
            cameras: EntityMap::new(),
            active_camera: None,
            materials: EntityMap::new(),
            assembly: Assembly::new("assembly"),
            background: Rgba::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    /// Returns the active camera.
    pub fn active_camera(&self) -> Result<&Camera, SceneError> {
        self.active_camera
            .as_deref()
            .and_then(|name| self.cameras.get(name))
            .ok_or(SceneError::MissingActiveCamera)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything an engine needs to render: the scene and the output frame layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Project name.
    pub name: String,
    /// The scene.
    pub scene: Scene,
    /// Output canvas.
    pub canvas: CanvasProperties,
    /// Output colour space.
    pub color_space: ColorSpace,
}

impl Project {
    /// A project with an empty scene.
    pub fn new(name: impl Into<String>, canvas: CanvasProperties) -> Self {
        Self {
            name: name.into(),
            scene: Scene::new(),
            canvas,
            color_space: ColorSpace::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_active_camera_is_an_error() {
        let mut scene = Scene::new();
        assert_eq!(scene.active_camera(), Err(SceneError::MissingActiveCamera));

        scene.cameras.insert(Camera::new("cam", Transform::IDENTITY));
        scene.active_camera = Some("cam".to_string());
        assert_eq!(scene.active_camera().map(|c| c.name.as_str()), Ok("cam"));
    }

    #[test]
    fn version_bumps_by_one() {
        let mut assembly = Assembly::new("a");
        assert_eq!(assembly.version_id(), 0);
        assembly.bump_version_id();
        assert_eq!(assembly.version_id(), 1);
    }
}
