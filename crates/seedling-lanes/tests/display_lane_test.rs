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

//! Integration tests for the display lane: blitting, brackets and the
//! end-of-pass handshake with the UI thread.

use seedling_core::display::{DisplayPresenter, DisplaySurface, Rect, Rgba, SharedDisplay};
use seedling_core::event::UiQueue;
use seedling_core::frame::{CanvasProperties, ColorSpace, Frame};
use seedling_core::renderer::{RendererController, TileCallback};
use seedling_core::{AtomicRenderStatus, DisplayError, RenderStatus};
use seedling_lanes::{InteractiveTileCallback, TileBlitter};
use seedling_telemetry::SessionMetrics;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Helper: an in-memory surface counting refreshes.
struct RecordingSurface {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    regions: Vec<Rect>,
    full_refreshes: usize,
}

impl RecordingSurface {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
            regions: Vec::new(),
            full_refreshes: 0,
        }
    }

    fn at(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }
}

impl DisplaySurface for RecordingSurface {
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
    fn put_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }
    fn refresh_region(&mut self, region: Rect) {
        self.regions.push(region);
    }
    fn refresh(&mut self) {
        self.full_refreshes += 1;
    }
}

struct StubController {
    status: AtomicRenderStatus,
}

impl StubController {
    fn with_status(status: RenderStatus) -> Arc<Self> {
        Arc::new(Self {
            status: AtomicRenderStatus::new(status),
        })
    }
}

impl RendererController for StubController {
    fn status(&self) -> RenderStatus {
        self.status.load()
    }
    fn on_rendering_begin(&self) {}
}

#[derive(Default)]
struct CountingPresenter {
    updates: AtomicUsize,
    stopped: bool,
}

impl DisplayPresenter for CountingPresenter {
    fn is_rendering(&self) -> bool {
        !self.stopped
    }
    fn update_display(&self) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }
}

fn shared(surface: &Arc<Mutex<RecordingSurface>>) -> SharedDisplay {
    surface.clone()
}

/// Helper: an 8x6 linear frame with 4x4 tiles, every pixel set to `color`.
fn filled_frame(color: Rgba) -> Frame {
    let mut frame = Frame::new(CanvasProperties::new(8, 6, 4, 4, 4), ColorSpace::Linear);
    for tile_y in 0..2 {
        for tile_x in 0..2 {
            let tile = frame.tile_mut(tile_x, tile_y).unwrap();
            for y in 0..tile.height() {
                for x in 0..tile.width() {
                    tile.set_pixel(x, y, color);
                }
            }
        }
    }
    frame
}

// ─────────────────────────────────────────────────────────────────────────────
// Blitting
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_progressive_frame_covers_the_whole_surface() {
    let surface = Arc::new(Mutex::new(RecordingSurface::new(8, 6)));
    let blitter = TileBlitter::new(shared(&surface), Arc::new(SessionMetrics::new()));
    let color = Rgba::new(0.25, 0.5, 0.75, 1.0);

    blitter.on_progressive_frame_end(&filled_frame(color)).unwrap();

    let surface = surface.lock().unwrap();
    assert!(surface.pixels.iter().all(|p| *p == color));
    assert_eq!(surface.full_refreshes, 1);
}

#[test]
fn test_tile_end_blits_one_tile_and_counts_it() {
    let surface = Arc::new(Mutex::new(RecordingSurface::new(8, 6)));
    let metrics = Arc::new(SessionMetrics::new());
    let blitter = TileBlitter::new(shared(&surface), Arc::clone(&metrics));

    blitter.on_tile_end(&filled_frame(Rgba::WHITE), 1, 1).unwrap();

    let surface = surface.lock().unwrap();
    assert_eq!(surface.regions, vec![Rect::new(4, 4, 4, 2)]);
    assert_eq!(surface.at(5, 5), Rgba::WHITE);
    assert_eq!(surface.at(0, 0), Rgba::TRANSPARENT);
    assert_eq!(blitter.rendered_tile_count(), 1);
    assert_eq!(metrics.snapshot().tiles_blitted, 1);
}

#[test]
fn test_srgb_frames_are_encoded_on_the_way_out() {
    let surface = Arc::new(Mutex::new(RecordingSurface::new(4, 4)));
    let blitter = TileBlitter::new(shared(&surface), Arc::new(SessionMetrics::new()));
    let mut frame = Frame::new(CanvasProperties::new(4, 4, 4, 4, 4), ColorSpace::Srgb);
    frame
        .tile_mut(0, 0)
        .unwrap()
        .set_pixel(0, 0, Rgba::new(0.5, 0.0, 1.0, 0.5));

    blitter.on_progressive_frame_end(&frame).unwrap();

    let pixel = surface.lock().unwrap().at(0, 0);
    assert!((pixel.r - 0.735).abs() < 1e-3);
    assert_eq!(pixel.g, 0.0);
    assert!((pixel.b - 1.0).abs() < 1e-5);
    assert_eq!(pixel.a, 0.5);
}

#[test]
fn test_mismatched_surface_is_rejected() {
    let surface = Arc::new(Mutex::new(RecordingSurface::new(4, 4)));
    let blitter = TileBlitter::new(shared(&surface), Arc::new(SessionMetrics::new()));

    let err = blitter
        .on_progressive_frame_end(&filled_frame(Rgba::WHITE))
        .unwrap_err();
    assert_eq!(
        err,
        DisplayError::CanvasMismatch {
            canvas: (8, 6, 4),
            display: (4, 4, 4),
        }
    );
    assert_eq!(surface.lock().unwrap().full_refreshes, 0);
}

#[test]
fn test_out_of_range_tile_is_rejected() {
    let surface = Arc::new(Mutex::new(RecordingSurface::new(8, 6)));
    let blitter = TileBlitter::new(shared(&surface), Arc::new(SessionMetrics::new()));

    let err = blitter.on_tile_end(&filled_frame(Rgba::WHITE), 2, 0).unwrap_err();
    assert_eq!(err, DisplayError::TileOutOfRange { tile_x: 2, tile_y: 0 });
}

#[test]
fn test_brackets_outline_the_starting_tile() {
    let surface = Arc::new(Mutex::new(RecordingSurface::new(8, 6)));
    let blitter =
        TileBlitter::new(shared(&surface), Arc::new(SessionMetrics::new())).with_brackets(2);

    blitter.on_tile_begin(&filled_frame(Rgba::WHITE), 1, 0).unwrap();

    let surface = surface.lock().unwrap();
    for (x, y) in [(4, 0), (5, 0), (4, 1), (7, 0), (6, 0), (7, 3), (4, 3), (7, 2)] {
        assert_eq!(surface.at(x, y), Rgba::WHITE, "corner pixel ({x}, {y})");
    }
    assert_eq!(surface.at(5, 1), Rgba::TRANSPARENT);
    assert_eq!(surface.at(0, 0), Rgba::TRANSPARENT);
    assert_eq!(surface.regions, vec![Rect::new(4, 0, 4, 4)]);
}

#[test]
fn test_no_brackets_by_default() {
    let surface = Arc::new(Mutex::new(RecordingSurface::new(8, 6)));
    let blitter = TileBlitter::new(shared(&surface), Arc::new(SessionMetrics::new()));

    blitter.on_tile_begin(&filled_frame(Rgba::WHITE), 0, 0).unwrap();

    let surface = surface.lock().unwrap();
    assert!(surface.pixels.iter().all(|p| *p == Rgba::TRANSPARENT));
    assert!(surface.regions.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// UI handshake
// ─────────────────────────────────────────────────────────────────────────────

struct Fixture {
    queue: UiQueue,
    presenter: Arc<CountingPresenter>,
    metrics: Arc<SessionMetrics>,
    callback: Arc<InteractiveTileCallback>,
}

fn fixture(status: RenderStatus, presenter: CountingPresenter, timeout: Option<Duration>) -> Fixture {
    let queue = UiQueue::new();
    let presenter = Arc::new(presenter);
    let metrics = Arc::new(SessionMetrics::new());
    let surface: SharedDisplay = Arc::new(Mutex::new(RecordingSurface::new(8, 6)));
    let callback = InteractiveTileCallback::new(
        TileBlitter::new(surface, Arc::clone(&metrics)),
        StubController::with_status(status),
        queue.poster(),
        presenter.clone(),
    )
    .with_handshake_timeout(timeout);
    Fixture {
        queue,
        presenter,
        metrics,
        callback: Arc::new(callback),
    }
}

#[test]
fn test_render_thread_waits_for_the_repaint() {
    let f = fixture(RenderStatus::Continue, CountingPresenter::default(), None);
    let (returned_tx, returned_rx) = mpsc::channel();

    let render_thread = {
        let callback = Arc::clone(&f.callback);
        thread::spawn(move || {
            let result = callback.on_progressive_frame_end(&filled_frame(Rgba::WHITE));
            returned_tx.send(()).unwrap();
            result
        })
    };

    assert!(
        returned_rx.recv_timeout(Duration::from_millis(100)).is_err(),
        "callback returned before the UI thread repainted"
    );
    assert_eq!(f.presenter.updates.load(Ordering::SeqCst), 0);

    assert_eq!(f.queue.pump_timeout(Duration::from_secs(5)), 1);
    returned_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    render_thread.join().unwrap().unwrap();

    assert_eq!(f.presenter.updates.load(Ordering::SeqCst), 1);
    assert_eq!(f.metrics.snapshot().frames_presented, 1);
}

#[test]
fn test_no_wait_when_not_continuing() {
    for status in [RenderStatus::Abort, RenderStatus::Reinitialize] {
        let f = fixture(status, CountingPresenter::default(), None);

        f.callback
            .on_progressive_frame_end(&filled_frame(Rgba::WHITE))
            .unwrap();

        // The repaint is still queued and harmless to run afterwards.
        assert_eq!(f.queue.pending(), 1);
        assert_eq!(f.queue.pump(), 1);
        assert_eq!(f.presenter.updates.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn test_presenter_not_rendering_still_releases_the_wait() {
    let presenter = CountingPresenter {
        stopped: true,
        ..Default::default()
    };
    let f = fixture(RenderStatus::Continue, presenter, None);

    let render_thread = {
        let callback = Arc::clone(&f.callback);
        thread::spawn(move || callback.on_progressive_frame_end(&filled_frame(Rgba::WHITE)))
    };
    f.queue.pump_timeout(Duration::from_secs(5));
    render_thread.join().unwrap().unwrap();

    assert_eq!(f.presenter.updates.load(Ordering::SeqCst), 0);
    assert_eq!(f.metrics.snapshot().frames_presented, 1);
}

#[test]
fn test_handshake_timeout_resumes_rendering() {
    let f = fixture(
        RenderStatus::Continue,
        CountingPresenter::default(),
        Some(Duration::from_millis(20)),
    );

    f.callback
        .on_progressive_frame_end(&filled_frame(Rgba::WHITE))
        .unwrap();

    assert_eq!(f.metrics.snapshot().handshake_timeouts, 1);
    assert_eq!(f.queue.pending(), 1);
}

#[test]
fn test_dropped_ui_queue_does_not_block() {
    let Fixture {
        queue,
        callback,
        metrics,
        ..
    } = fixture(RenderStatus::Continue, CountingPresenter::default(), None);
    drop(queue);

    callback
        .on_progressive_frame_end(&filled_frame(Rgba::WHITE))
        .unwrap();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.frames_presented, 0);
    assert_eq!(snapshot.handshake_timeouts, 0);
}
