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

//! A tiny deterministic ray caster: instances are spheres lit by one
//! directional light.

use seedling_core::display::Rgba;
use seedling_core::scene::{Project, Transform};
use seedling_core::SceneError;

const NEUTRAL: Rgba = Rgba::new(0.6, 0.6, 0.6, 1.0);
const AMBIENT: f32 = 0.15;

type Vec3 = [f32; 3];

fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn normalize(v: Vec3) -> Vec3 {
    let len = dot(v, v).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

#[derive(Debug, Clone, Copy)]
struct Sphere {
    center: Vec3,
    radius: f32,
    color: Rgba,
    emission: f32,
}

impl Sphere {
    fn from_transform(transform: &Transform, radius: f32, color: Rgba, emission: f32) -> Self {
        Self {
            center: transform.translation,
            radius: radius * transform.scale,
            color,
            emission,
        }
    }

    /// Distance along the unit ray `dir` from `origin` to the nearest hit.
    fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let oc = sub(origin, self.center);
        let b = dot(oc, dir);
        let c = dot(oc, oc) - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        [-b - root, -b + root].into_iter().find(|t| *t > 1e-4)
    }
}

/// The parts of a project the engine needs, copied out of the project lock.
#[derive(Debug, Clone)]
pub(crate) struct SceneSnapshot {
    eye: Vec3,
    tan_half_fov: f32,
    spheres: Vec<Sphere>,
    background: Rgba,
    light: Vec3,
}

impl SceneSnapshot {
    /// Copies the active camera, the instances and their materials.
    pub(crate) fn capture(project: &Project) -> Result<Self, SceneError> {
        let scene = &project.scene;
        let camera = scene.active_camera()?;

        let mut spheres = Vec::new();
        for instance in scene.assembly.object_instances.iter() {
            let material = instance
                .material
                .as_deref()
                .and_then(|name| scene.materials.get(name));
            let (color, emission) = match material {
                Some(m) => (m.base_color, m.emission),
                None => (NEUTRAL, 0.0),
            };
            spheres.push(Sphere::from_transform(&instance.transform, 0.5, color, emission));
        }
        for instance in scene.assembly.assembly_instances.iter() {
            spheres.push(Sphere::from_transform(&instance.transform, 1.0, NEUTRAL, 0.0));
        }

        Ok(Self {
            eye: camera.transform.translation,
            tan_half_fov: (camera.fov_degrees.to_radians() * 0.5).tan(),
            spheres,
            background: scene.background,
            light: normalize([0.4, 0.8, 0.6]),
        })
    }

    /// Shades the point `(u, v)` of the image plane, both in `[-1, 1]` with
    /// `u` already scaled by the aspect ratio. The camera looks down `-z`.
    pub(crate) fn shade(&self, u: f32, v: f32) -> Rgba {
        let dir = normalize([u * self.tan_half_fov, v * self.tan_half_fov, -1.0]);

        let nearest = self
            .spheres
            .iter()
            .filter_map(|s| s.intersect(self.eye, dir).map(|t| (t, s)))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        let Some((t, sphere)) = nearest else {
            return self.background;
        };
        let hit = [
            self.eye[0] + dir[0] * t,
            self.eye[1] + dir[1] * t,
            self.eye[2] + dir[2] * t,
        ];
        let normal = normalize(sub(hit, sphere.center));
        let lit = AMBIENT + (1.0 - AMBIENT) * dot(normal, self.light).max(0.0);
        let c = sphere.color.scaled(lit + sphere.emission);
        Rgba::new(c.r, c.g, c.b, 1.0)
    }
}

fn hash(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

fn unit(h: u32) -> f32 {
    (h >> 8) as f32 / (1u32 << 24) as f32
}

/// Sub-pixel offset in `[0, 1)^2` of the sample taken at pixel `(x, y)`
/// during pass `pass`. Deterministic.
pub(crate) fn jitter(pass: u32, x: u32, y: u32) -> (f32, f32) {
    let h = hash(x ^ hash(y ^ hash(pass)));
    (unit(h), unit(hash(h)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_core::frame::CanvasProperties;
    use seedling_core::scene::{Camera, ObjectInstance};

    fn project_with_camera() -> Project {
        let mut project = Project::new("shade", CanvasProperties::new(4, 4, 4, 4, 4));
        project
            .scene
            .cameras
            .insert(Camera::new("cam", Transform::from_translation([0.0, 0.0, 5.0])));
        project.scene.active_camera = Some("cam".to_string());
        project.scene.background = Rgba::new(0.1, 0.2, 0.3, 1.0);
        project
    }

    #[test]
    fn empty_scene_shows_background() {
        let snapshot = SceneSnapshot::capture(&project_with_camera()).unwrap();
        assert_eq!(snapshot.shade(0.0, 0.0), Rgba::new(0.1, 0.2, 0.3, 1.0));
    }

    #[test]
    fn sphere_in_front_of_camera_is_hit() {
        let mut project = project_with_camera();
        project.scene.assembly.object_instances.insert(ObjectInstance {
            name: "ball_inst".to_string(),
            object: "ball".to_string(),
            transform: Transform::IDENTITY,
            material: None,
        });
        let snapshot = SceneSnapshot::capture(&project).unwrap();

        assert_ne!(snapshot.shade(0.0, 0.0), project.scene.background);
        assert_eq!(snapshot.shade(1.0, 1.0), project.scene.background);
    }

    #[test]
    fn capture_requires_a_camera() {
        let project = Project::new("no camera", CanvasProperties::new(4, 4, 4, 4, 4));
        assert_eq!(
            SceneSnapshot::capture(&project).unwrap_err(),
            SceneError::MissingActiveCamera
        );
    }

    #[test]
    fn jitter_is_deterministic_and_in_range() {
        for pass in 0..8 {
            let (a, b) = jitter(pass, 3, 7);
            assert_eq!((a, b), jitter(pass, 3, 7));
            assert!((0.0..1.0).contains(&a) && (0.0..1.0).contains(&b));
        }
        assert_ne!(jitter(0, 3, 7), jitter(1, 3, 7));
    }
}
