//! Cancelable delayed tasks.
//!
//! Used to hold the computer's reply back for a moment. Every scheduled task
//! can be cancelled through its [`TaskHandle`] until it fires, and dropping
//! the [`Scheduler`] cancels whatever is still pending.

use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, instrument};

/// Identifies one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    id: u64,
}

/// Owns delayed tasks spawned on the tokio runtime.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    tasks: HashMap<u64, JoinHandle<()>>,
}

impl Scheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` once `delay` has elapsed, unless cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self, task))]
    pub fn schedule<F>(&mut self, delay: Duration, task: F) -> TaskHandle
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.retain(|_, handle| !handle.is_finished());

        let id = self.next_id;
        self.next_id += 1;
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            task();
        });
        self.tasks.insert(id, handle);
        debug!(id, "Task scheduled");
        TaskHandle { id }
    }

    /// Cancels a task. Returns true if it had not run yet.
    #[instrument(skip(self))]
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.tasks.remove(&handle.id) {
            Some(task) => {
                let was_pending = !task.is_finished();
                task.abort();
                debug!(id = handle.id, was_pending, "Task cancelled");
                was_pending
            }
            None => false,
        }
    }

    /// Cancels every task that has not run yet.
    pub fn cancel_all(&mut self) {
        for (id, task) in self.tasks.drain() {
            if !task.is_finished() {
                debug!(id, "Cancelling pending task");
            }
            task.abort();
        }
    }

    /// Number of tasks that have not finished.
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
