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

use seedling_core::scene::{
    AssemblyInstance, Material, MaterialSource, NodeKind, ObjectInstance, SceneNode,
    SceneTranslator, TranslatedInstance, Transform,
};
use seedling_core::SceneError;

/// Translates host nodes one to one: every geometry node becomes an object
/// instance of an object named after it, every group node an assembly
/// instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicSceneTranslator;

impl BasicSceneTranslator {
    /// Name of the instance built for the node named `node`.
    pub fn instance_name(kind: NodeKind, node: &str) -> String {
        match kind {
            NodeKind::Geometry => format!("{node}_inst"),
            NodeKind::Group => format!("{node}_assembly_inst"),
        }
    }

    fn check_transform(node: &SceneNode) -> Result<Transform, SceneError> {
        let t = node.transform;
        if t.translation.iter().all(|c| c.is_finite()) && t.scale.is_finite() && t.scale > 0.0 {
            return Ok(t);
        }
        Err(SceneError::TranslationFailed {
            source_name: node.name.clone(),
            details: format!("invalid transform {t:?}"),
        })
    }
}

impl SceneTranslator for BasicSceneTranslator {
    fn build_material(&self, source: &MaterialSource, name: &str) -> Result<Material, SceneError> {
        if name.is_empty() {
            return Err(SceneError::TranslationFailed {
                source_name: format!("material #{}", source.id),
                details: "empty material name".to_string(),
            });
        }
        Ok(Material {
            name: name.to_string(),
            source_id: source.id,
            base_color: source.base_color,
            emission: source.emission.max(0.0),
            shader_nodes: vec![format!("{name}_bsdf"), format!("{name}_surface_shader")],
        })
    }

    fn build_instance(&self, node: &SceneNode) -> Result<TranslatedInstance, SceneError> {
        if node.name.is_empty() {
            return Err(SceneError::TranslationFailed {
                source_name: String::new(),
                details: "unnamed node".to_string(),
            });
        }
        let transform = Self::check_transform(node)?;
        let name = Self::instance_name(node.kind, &node.name);

        Ok(match node.kind {
            NodeKind::Geometry => TranslatedInstance::Object(ObjectInstance {
                name,
                object: node.name.clone(),
                transform,
                material: node.material.clone(),
            }),
            NodeKind::Group => TranslatedInstance::Assembly(AssemblyInstance {
                name,
                assembly: node.name.clone(),
                transform,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_core::display::Rgba;

    #[test]
    fn geometry_and_group_nodes_map_to_their_instance_kind() {
        let translator = BasicSceneTranslator;

        let object = translator
            .build_instance(&SceneNode::geometry("teapot").with_material("red"))
            .unwrap();
        assert!(matches!(
            object,
            TranslatedInstance::Object(ObjectInstance { ref name, ref material, .. })
                if name == "teapot_inst" && material.as_deref() == Some("red")
        ));

        let group = translator.build_instance(&SceneNode::group("props")).unwrap();
        assert!(matches!(
            group,
            TranslatedInstance::Assembly(AssemblyInstance { ref name, .. }) if name == "props_assembly_inst"
        ));
    }

    #[test]
    fn degenerate_transform_fails() {
        let node = SceneNode::geometry("flat").with_transform(Transform {
            translation: [0.0; 3],
            scale: 0.0,
        });
        assert!(matches!(
            BasicSceneTranslator.build_instance(&node),
            Err(SceneError::TranslationFailed { .. })
        ));
    }

    #[test]
    fn material_keeps_its_source_identity() {
        let source = MaterialSource::new(42, Rgba::new(0.8, 0.1, 0.1, 1.0));
        let material = BasicSceneTranslator.build_material(&source, "red").unwrap();
        assert_eq!(material.source_id, 42);
        assert_eq!(material.base_color, source.base_color);
        assert_eq!(material.shader_nodes.len(), 2);
    }
}
