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

// Seedling Runtime
// Headless host: renders a demo scene interactively, replays a script of
// host edits while it renders, then saves the display to a PNG.

use anyhow::{anyhow, Context, Result};
use seedling_sdk::prelude::*;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const WIDTH: usize = 320;
const HEIGHT: usize = 240;
const TILE_SIZE: usize = 32;

/// Passes to let accumulate after the last scripted edit.
const SETTLE_PASSES: u64 = 24;

/// Runtime options, read from an optional JSON file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RuntimeConfig {
    session: SessionConfig,
    engine: EngineSettings,
}

/// Counts repaints the way a host window would perform them.
#[derive(Default)]
struct HeadlessPresenter {
    repaints: AtomicU64,
}

impl DisplayPresenter for HeadlessPresenter {
    fn update_display(&self) {
        let n = self.repaints.fetch_add(1, Ordering::Relaxed) + 1;
        log::trace!("Repaint #{n}.");
    }
}

fn parse_args() -> Result<(PathBuf, RuntimeConfig)> {
    let mut args = std::env::args().skip(1);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("seedling.png"));
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config '{path}'"))?;
            serde_json::from_str(&json).with_context(|| format!("Invalid config '{path}'"))?
        }
        None => RuntimeConfig::default(),
    };
    Ok((output, config))
}

fn material(id: u64, r: f32, g: f32, b: f32) -> MaterialSource {
    MaterialSource::new(id, Rgba::new(r, g, b, 1.0))
}

fn demo_scene() -> Result<Arc<SceneContext>> {
    let mut project = Project::new(
        "demo",
        CanvasProperties::new(WIDTH, HEIGHT, TILE_SIZE, TILE_SIZE, 4),
    );
    project.scene.background = Rgba::new(0.05, 0.07, 0.12, 1.0);
    let scene = SceneContext::new(project, Arc::new(BasicSceneTranslator));

    {
        let mut writer = scene.writer()?;
        let translator = BasicSceneTranslator;
        let project = writer.project_mut();
        for (source, name) in [
            (material(1, 0.8, 0.1, 0.1), "red"),
            (material(2, 0.1, 0.7, 0.2), "green"),
        ] {
            project
                .scene
                .materials
                .insert(translator.build_material(&source, name)?);
        }
        project.scene.cameras.insert(Camera::new(
            "persp",
            Transform::from_translation([0.0, 0.0, 6.0]),
        ));
        project.scene.active_camera = Some("persp".to_string());
    }

    scene.populate(&[
        SceneNode::geometry("ball")
            .with_material("red")
            .with_transform(Transform {
                translation: [-0.8, 0.0, 0.0],
                scale: 2.0,
            }),
        SceneNode::geometry("cube")
            .with_material("green")
            .with_transform(Transform::from_translation([1.2, 0.4, -1.0])),
    ])?;
    Ok(scene)
}

/// Host edits replayed while rendering, keyed by the number of frames
/// presented before they are made.
fn edit_script() -> Vec<(u64, SceneEdit)> {
    vec![
        (
            4,
            SceneEdit::CameraChanged(Camera::new(
                "persp",
                Transform::from_translation([0.3, 0.2, 5.0]),
            )),
        ),
        (
            8,
            SceneEdit::MaterialsChanged(vec![(material(1, 0.9, 0.6, 0.1), "red".to_string())]),
        ),
        (
            12,
            SceneEdit::NodesCreated(vec![SceneNode::geometry("moon")
                .with_material("green")
                .with_transform(Transform {
                    translation: [0.4, 1.3, 0.5],
                    scale: 0.5,
                })]),
        ),
        (16, SceneEdit::NodesDeleted(vec!["cube".to_string()])),
        (
            20,
            SceneEdit::NodesModified(vec![SceneNode::geometry("ball")
                .with_material("red")
                .with_transform(Transform {
                    translation: [-0.4, -0.2, 0.0],
                    scale: 2.2,
                })]),
        ),
    ]
}

fn run(output: PathBuf, config: RuntimeConfig) -> Result<()> {
    let scene = demo_scene()?;
    let buffer = Arc::new(Mutex::new(PixelBuffer::new(WIDTH, HEIGHT)));
    let display: SharedDisplay = buffer.clone();
    let presenter = Arc::new(HeadlessPresenter::default());

    let mut session = InteractiveSession::new(scene, display, presenter.clone(), config.session);
    session.start(ProgressiveEngine::new(config.engine))?;

    let mut script = edit_script().into_iter().peekable();
    let mut last_edit_at = 0;
    let started = Instant::now();
    let frame_interval = Duration::from_millis(16);

    // UI loop.
    loop {
        session.pump_ui_timeout(frame_interval);
        let presented = session.metrics().frames_presented;

        while let Some((at, _)) = script.peek() {
            if *at > presented {
                break;
            }
            if let Some((_, edit)) = script.next() {
                log::info!("Frame {presented}: {}.", edit.kind());
                session.apply_edit(edit);
                last_edit_at = presented;
            }
        }

        if session.render_finished() {
            log::info!("Engine finished on its own.");
            break;
        }
        if script.peek().is_none() && presented >= last_edit_at + SETTLE_PASSES {
            break;
        }
    }

    let report = session.end()?;
    log::info!(
        "Rendered {} pass(es) in {:.2}s, {} repaint(s).",
        report.outcome.passes(),
        started.elapsed().as_secs_f32(),
        presenter.repaints.load(Ordering::Relaxed)
    );
    log::debug!("Report: {}", report.to_json()?);

    buffer
        .lock()
        .map_err(|_| anyhow!("The display buffer is poisoned"))?
        .save_png(&output)?;
    Ok(())
}

fn main() -> Result<()> {
    seedling_telemetry::logging::init("info");
    let (output, config) = parse_args()?;
    run(output, config)
}
