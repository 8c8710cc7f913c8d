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

//! Drives the progressive engine with the bare controller, without a
//! session, to check that edits scheduled mid-render land on their own.

use seedling_control::InteractiveRendererController;
use seedling_core::frame::Frame;
use seedling_core::renderer::{RendererController, TileCallback};
use seedling_core::DisplayError;
use seedling_sdk::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Helper: a tile callback that drops every pixel.
struct DiscardTiles;

impl TileCallback for DiscardTiles {
    fn on_progressive_frame_end(&self, _frame: &Frame) -> Result<(), DisplayError> {
        Ok(())
    }
}

fn scene() -> Arc<SceneContext> {
    seedling_telemetry::logging::try_init_for_tests();
    let project = Project::new("bare", CanvasProperties::new(8, 8, 4, 4, 4));
    let scene = SceneContext::new(project, Arc::new(BasicSceneTranslator));

    let mut writer = scene.writer().unwrap();
    let project = writer.project_mut();
    project
        .scene
        .cameras
        .insert(Camera::new("cam", Transform::from_translation([0.0, 0.0, 4.0])));
    project.scene.active_camera = Some("cam".to_string());
    drop(writer);
    scene
}

fn wait_for(what: &str, mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() {
        assert!(Instant::now() < deadline, "{what} not reached in time");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_edit_scheduled_mid_render_is_applied_without_explicit_reinitialize() {
    let scene = scene();
    let controller = Arc::new(InteractiveRendererController::new());

    let render = {
        let scene = Arc::clone(&scene);
        let controller = Arc::clone(&controller);
        thread::spawn(move || {
            let mut engine = ProgressiveEngine::new(EngineSettings {
                pass_delay_ms: 1,
                ..Default::default()
            });
            engine.render(scene.project(), controller.as_ref(), &DiscardTiles)
        })
    };

    wait_for("first pass", || controller.metrics().snapshot().passes_rendered >= 1);
    controller.schedule(Box::new(AddInstances::new(
        &scene,
        vec![SceneNode::geometry("late")],
    )));
    wait_for("late instance", || scene.is_instantiated("late"));

    assert_eq!(controller.pending_actions(), 0);
    assert_eq!(controller.status(), RenderStatus::Continue);

    controller.request_abort();
    let outcome = render.join().unwrap().unwrap();
    assert!(matches!(outcome, RenderOutcome::Aborted { .. }));
}
