//! Delayed, cancellable callbacks representing simulated confirmation latency.
//!
//! Delays are explicit schedulable units (deadline + task) rather than
//! ambient timeout calls, so tests can drive them deterministically with
//! tokio's paused clock.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle to a scheduled callback.
///
/// Dropping the handle detaches the task: ledger mutations are process-wide
/// and always complete even if the subscriber that triggered them is gone.
/// `cancel` exists for view-scoped callers that do want teardown.
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Runs `task` after `delay` on the current tokio runtime.
pub fn schedule<F>(delay: Duration, task: F) -> ScheduledTask
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        task.await;
    });
    ScheduledTask { handle }
}
