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

//! Scene data model shared by the engine, the scheduled actions and the host.

mod entity;
mod model;
mod node;

pub use self::entity::{Entity, EntityMap};
pub use self::model::{
    Assembly, AssemblyInstance, Camera, Material, ObjectInstance, Project, Scene, Transform,
};
pub use self::node::{MaterialSource, NodeKind, SceneNode, SceneTranslator, TranslatedInstance};
