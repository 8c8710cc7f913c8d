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

//! The renderer controller of an interactive session.

use crate::action::ScheduledAction;
use crate::error::ActionError;
use seedling_core::renderer::RendererController;
use seedling_core::{AtomicRenderStatus, RenderStatus};
use seedling_telemetry::SessionMetrics;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type ActionQueue = Vec<Box<dyn ScheduledAction>>;

/// The state shared by the UI thread and the render thread: the status the
/// engine polls and the queue of pending scene edits.
///
/// The UI thread calls [`schedule`](Self::schedule) and the status setters at
/// any time. Scheduling requests a reinitialize, so the engine ends its
/// current pass and calls [`RendererController::on_rendering_begin`], which
/// applies everything scheduled so far, in order.
///
/// # Failure policy
///
/// A failing action is fatal to the session. The drain stops at that action,
/// the rest of the batch is discarded, the error is kept for
/// [`take_failure`](Self::take_failure) and the status is set to
/// [`RenderStatus::Abort`] so the engine returns.
///
/// # Status reset
///
/// Each drain turns a `Reinitialize` status back into `Continue`, before the
/// batch is taken. `Abort` is terminal and survives the drain.
pub struct InteractiveRendererController {
    status: AtomicRenderStatus,
    queue: Mutex<ActionQueue>,
    failure: Mutex<Option<ActionError>>,
    metrics: Arc<SessionMetrics>,
}

impl InteractiveRendererController {
    /// Creates a controller with its own counters.
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(SessionMetrics::new()))
    }

    /// Creates a controller reporting into `metrics`.
    pub fn with_metrics(metrics: Arc<SessionMetrics>) -> Self {
        Self {
            status: AtomicRenderStatus::new(RenderStatus::Continue),
            queue: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            metrics,
        }
    }

    /// Queues an action for the next pass boundary and asks the engine to
    /// restart accumulation, which is where the queue is drained.
    ///
    /// Never waits on the render thread: the queue lock is only held by
    /// other `schedule` calls and by the swap at the start of a drain.
    pub fn schedule(&self, action: Box<dyn ScheduledAction>) {
        log::trace!("Scheduling '{}'.", action.label());
        self.lock_queue().push(action);
        self.metrics.record_scheduled();
        self.request_reinitialize();
    }

    /// Overwrites the status.
    pub fn set_status(&self, status: RenderStatus) {
        self.status.store(status);
    }

    /// Asks the engine to stop.
    pub fn request_abort(&self) {
        log::debug!("Abort requested.");
        self.status.store(RenderStatus::Abort);
    }

    /// Asks the engine to restart accumulation from the current scene.
    ///
    /// Ignored once an abort has been requested.
    pub fn request_reinitialize(&self) {
        if self.status.compare_exchange(RenderStatus::Continue, RenderStatus::Reinitialize)
            == RenderStatus::Abort
        {
            log::debug!("Reinitialize ignored, the session is aborting.");
        }
    }

    /// Number of actions waiting for the next pass boundary.
    pub fn pending_actions(&self) -> usize {
        self.lock_queue().len()
    }

    /// Takes the error of the action that aborted the session, if any.
    pub fn take_failure(&self) -> Option<ActionError> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// The counters this controller reports into.
    pub fn metrics(&self) -> &Arc<SessionMetrics> {
        &self.metrics
    }

    /// Applies every queued action, returning how many were applied.
    fn drain(&self) -> Result<usize, ActionError> {
        // Swap under the lock, apply outside of it: edits scheduled while the
        // batch runs land in the next drain.
        let batch = std::mem::take(&mut *self.lock_queue());
        let mut actions = batch.into_iter();
        let mut applied = 0;

        while let Some(action) = actions.next() {
            let label = action.label();
            if let Err(e) = action.apply() {
                let discarded = actions.len();
                log::error!("Scheduled action '{label}' failed: {e}. Aborting the session.");
                if discarded > 0 {
                    log::warn!("Discarded {discarded} action(s) scheduled after '{label}'.");
                }
                self.metrics.record_drain(applied as u64);
                return Err(e);
            }
            applied += 1;
        }

        if applied > 0 {
            self.metrics.record_drain(applied as u64);
            log::debug!("Applied {applied} scheduled action(s).");
        }
        Ok(applied)
    }

    fn lock_queue(&self) -> MutexGuard<'_, ActionQueue> {
        // Push and take cannot leave the Vec half-updated.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InteractiveRendererController {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererController for InteractiveRendererController {
    fn status(&self) -> RenderStatus {
        self.status.load()
    }

    /// Resets the status and applies the pending batch.
    ///
    /// Only `Reinitialize` is reset to `Continue`. An unconditional reset
    /// would turn an abort requested before the drain back into
    /// `Continue`, and the engine would keep rendering.
    fn on_rendering_begin(&self) {
        // Consume the pending reinitialize before taking the batch, so a
        // request made while the batch runs triggers another restart.
        self.status
            .compare_exchange(RenderStatus::Reinitialize, RenderStatus::Continue);

        if let Err(e) = self.drain() {
            let mut failure = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
            if failure.is_none() {
                *failure = Some(e);
            }
            self.status.store(RenderStatus::Abort);
        }
    }

    fn on_rendering_success(&self) {
        log::info!("Interactive rendering finished.");
    }

    fn on_rendering_abort(&self) {
        log::info!("Interactive rendering stopped.");
    }

    fn on_frame_end(&self) {
        self.metrics.record_pass();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct Record {
        id: usize,
        log: Arc<Mutex<Vec<usize>>>,
    }

    impl ScheduledAction for Record {
        fn label(&self) -> &'static str {
            "record"
        }

        fn apply(self: Box<Self>) -> Result<(), ActionError> {
            self.log.lock().unwrap().push(self.id);
            Ok(())
        }
    }

    struct Fail;

    impl ScheduledAction for Fail {
        fn label(&self) -> &'static str {
            "fail"
        }

        fn apply(self: Box<Self>) -> Result<(), ActionError> {
            Err(ActionError::SceneReleased)
        }
    }

    /// Schedules a follow-up action while it is being applied.
    struct Nested {
        controller: Arc<InteractiveRendererController>,
        log: Arc<Mutex<Vec<usize>>>,
    }

    impl ScheduledAction for Nested {
        fn label(&self) -> &'static str {
            "nested"
        }

        fn apply(self: Box<Self>) -> Result<(), ActionError> {
            self.log.lock().unwrap().push(1);
            self.controller.schedule(record(2, &self.log));
            Ok(())
        }
    }

    fn record(id: usize, log: &Arc<Mutex<Vec<usize>>>) -> Box<dyn ScheduledAction> {
        Box::new(Record {
            id,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn drain_applies_in_schedule_order() {
        let controller = InteractiveRendererController::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for id in 0..5 {
            controller.schedule(record(id, &log));
        }
        assert_eq!(controller.pending_actions(), 5);

        controller.on_rendering_begin();

        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(controller.pending_actions(), 0);
    }

    #[test]
    fn nothing_applies_before_the_pass_boundary() {
        let controller = InteractiveRendererController::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.schedule(record(7, &log));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn scheduling_requests_a_restart() {
        let controller = InteractiveRendererController::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.schedule(record(1, &log));
        assert_eq!(controller.status(), RenderStatus::Reinitialize);

        controller.on_rendering_begin();
        assert_eq!(controller.status(), RenderStatus::Continue);
        assert_eq!(*log.lock().unwrap(), vec![1]);
    }

    #[test]
    fn scheduling_does_not_clear_an_abort() {
        let controller = InteractiveRendererController::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.request_abort();
        controller.schedule(record(1, &log));
        assert_eq!(controller.status(), RenderStatus::Abort);
    }

    #[test]
    fn action_scheduled_during_a_drain_waits_for_the_next_one() {
        let controller = Arc::new(InteractiveRendererController::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.schedule(Box::new(Nested {
            controller: Arc::clone(&controller),
            log: Arc::clone(&log),
        }));

        controller.on_rendering_begin();
        assert_eq!(*log.lock().unwrap(), vec![1]);
        assert_eq!(controller.pending_actions(), 1);
        assert_eq!(controller.status(), RenderStatus::Reinitialize);

        controller.on_rendering_begin();
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
        assert_eq!(controller.pending_actions(), 0);
    }

    #[test]
    fn drain_resets_reinitialize_and_keeps_continue() {
        let controller = InteractiveRendererController::new();
        controller.on_rendering_begin();
        assert_eq!(controller.status(), RenderStatus::Continue);

        controller.request_reinitialize();
        assert_eq!(controller.status(), RenderStatus::Reinitialize);
        controller.on_rendering_begin();
        assert_eq!(controller.status(), RenderStatus::Continue);
    }

    #[test]
    fn abort_survives_drain_and_blocks_reinitialize() {
        let controller = InteractiveRendererController::new();
        controller.request_abort();
        controller.request_reinitialize();
        assert_eq!(controller.status(), RenderStatus::Abort);
        controller.on_rendering_begin();
        assert_eq!(controller.status(), RenderStatus::Abort);
    }

    #[test]
    fn failing_action_aborts_and_discards_rest_of_batch() {
        let controller = InteractiveRendererController::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.schedule(record(1, &log));
        controller.schedule(Box::new(Fail));
        controller.schedule(record(2, &log));

        controller.on_rendering_begin();

        assert_eq!(*log.lock().unwrap(), vec![1]);
        assert_eq!(controller.status(), RenderStatus::Abort);
        assert_eq!(controller.take_failure(), Some(ActionError::SceneReleased));
        assert_eq!(controller.take_failure(), None);
        assert_eq!(controller.pending_actions(), 0);
    }

    #[test]
    fn concurrent_scheduling_applies_each_action_once() {
        const COUNT: usize = 2_000;
        let controller = Arc::new(InteractiveRendererController::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(AtomicUsize::new(0));

        let producer = {
            let controller = Arc::clone(&controller);
            let log = Arc::clone(&log);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                for id in 0..COUNT {
                    controller.schedule(record(id, &log));
                }
                done.store(1, Ordering::SeqCst);
            })
        };

        while done.load(Ordering::SeqCst) == 0 {
            controller.on_rendering_begin();
        }
        producer.join().unwrap();
        controller.on_rendering_begin();

        let applied = log.lock().unwrap();
        assert_eq!(applied.len(), COUNT);
        assert!(applied.windows(2).all(|w| w[0] + 1 == w[1]));
        assert_eq!(controller.metrics().snapshot().actions_applied, COUNT as u64);
    }
}
