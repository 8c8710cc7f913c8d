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

use std::fmt;
use std::time::Duration;

/// A unit of work to run on the UI thread.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// A queue of tasks executed on the thread that owns it.
///
/// Any thread can post through a [`UiPoster`]; only the owner runs tasks, by
/// calling [`pump`](Self::pump) from its event loop.
pub struct UiQueue {
    sender: flume::Sender<UiTask>,
    receiver: flume::Receiver<UiTask>,
}

impl UiQueue {
    /// Creates a new queue backed by an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("UI task queue initialized.");
        Self { sender, receiver }
    }

    /// Returns a handle other threads can post tasks through.
    pub fn poster(&self) -> UiPoster {
        UiPoster {
            sender: self.sender.clone(),
        }
    }

    /// Runs every task that is already queued, without waiting.
    ///
    /// ## Returns
    /// The number of tasks run.
    pub fn pump(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        if ran > 0 {
            log::trace!("Pumped {ran} UI task(s).");
        }
        ran
    }

    /// Waits up to `timeout` for a task, then runs everything queued.
    ///
    /// ## Returns
    /// The number of tasks run.
    pub fn pump_timeout(&self, timeout: Duration) -> usize {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                task();
                1 + self.pump()
            }
            Err(_) => 0,
        }
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for UiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UiQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

/// The sending side of a [`UiQueue`].
#[derive(Clone)]
pub struct UiPoster {
    sender: flume::Sender<UiTask>,
}

impl UiPoster {
    /// Queues `task` for the UI thread.
    ///
    /// ## Returns
    /// `false`, after logging, if the queue has been dropped. The task is
    /// dropped without running in that case.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(e) = self.sender.send(Box::new(task)) {
            log::error!("Failed to post UI task: {e}. UI queue likely dropped.");
            return false;
        }
        true
    }
}

impl fmt::Debug for UiPoster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiPoster").finish_non_exhaustive()
    }
}
